//! Deferred change notification.

use std::cell::RefCell;
use std::marker::PhantomData;

struct Pending {
    key: usize,
    version: u64,
    deliver: Box<dyn FnOnce(u64)>,
}

#[derive(Default)]
struct Batch {
    depth: usize,
    pending: Vec<Pending>,
}

thread_local! {
    static BATCH: RefCell<Batch> = RefCell::new(Batch::default());
}

/// Defers observable notifications on this thread until the outermost scope
/// is dropped.
///
/// Values are written immediately, so anything read inside the scope is
/// already current. On exit each changed observable notifies once, with its
/// latest value, in the order the observables first changed. By the time any
/// subscriber runs, every write made in the scope is visible.
pub struct BatchScope {
    _not_send: PhantomData<*const ()>,
}

impl BatchScope {
    pub fn new() -> Self {
        BATCH.with(|batch| batch.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let pending = BATCH.with(|batch| {
            let mut batch = batch.borrow_mut();
            batch.depth -= 1;
            if batch.depth == 0 {
                std::mem::take(&mut batch.pending)
            } else {
                Vec::new()
            }
        });

        for p in pending {
            (p.deliver)(p.version);
        }
    }
}

/// Queue a notification for the observable identified by `key` if a batch is
/// open. Returns `false` when the caller must notify now.
///
/// An observable that is already queued only has its version bumped, so it
/// still notifies once.
pub(crate) fn defer(
    key: usize,
    version: u64,
    deliver: impl FnOnce() -> Box<dyn FnOnce(u64)>,
) -> bool {
    BATCH.with(|batch| {
        let mut batch = batch.borrow_mut();
        if batch.depth == 0 {
            return false;
        }
        match batch.pending.iter_mut().find(|p| p.key == key) {
            Some(queued) => queued.version = version,
            None => batch.pending.push(Pending {
                key,
                version,
                deliver: deliver(),
            }),
        }
        true
    })
}
