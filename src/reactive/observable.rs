//! Latest-value cells with synchronous change notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::batch;

struct Listener<T> {
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct Inner<T> {
    value: T,
    version: u64,
    listeners: Vec<Rc<Listener<T>>>,
}

/// A shared value that pushes every change to its subscribers.
///
/// Cloning an `Observable` yields another handle to the same cell.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// `f` must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of changes delivered so far.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Store `value` and notify subscribers, unless it equals the current
    /// value. Returns whether a notification was sent.
    pub fn set(&self, value: T) -> bool {
        if self.inner.borrow().value == value {
            return false;
        }
        self.replace(value);
        true
    }

    /// Store `value` and notify subscribers unconditionally.
    ///
    /// Inside a [`BatchScope`](super::BatchScope) the notification waits
    /// for the scope to end.
    pub fn replace(&self, value: T) {
        let version = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            inner.version
        };

        let key = Rc::as_ptr(&self.inner) as *const () as usize;
        let deferred = batch::defer(key, version, || -> Box<dyn FnOnce(u64)> {
            let this = self.clone();
            // A change made after the batch closed has already notified.
            Box::new(move |expected: u64| {
                if this.version() == expected {
                    this.notify();
                }
            })
        });
        if !deferred {
            self.notify();
        }
    }

    /// Register `callback` and immediately replay the current value to it.
    ///
    /// The callback fires again after every change until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let listener = Rc::new(Listener {
            active: Cell::new(true),
            callback: Box::new(callback),
        });
        self.inner.borrow_mut().listeners.push(Rc::clone(&listener));

        let current = self.get();
        (listener.callback)(&current);

        let inner = Rc::downgrade(&self.inner);
        let weak_listener = Rc::downgrade(&listener);
        Subscription::new(move || Self::detach(&inner, &weak_listener))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// A handle that can observe this cell but not write to it.
    pub fn read_only(&self) -> ReadOnly<T> {
        ReadOnly {
            source: self.clone(),
        }
    }

    fn detach(inner: &Weak<RefCell<Inner<T>>>, listener: &Weak<Listener<T>>) {
        let Some(listener) = listener.upgrade() else {
            return;
        };
        listener.active.set(false);
        if let Some(inner) = inner.upgrade() {
            inner
                .borrow_mut()
                .listeners
                .retain(|l| !Rc::ptr_eq(l, &listener));
        }
    }

    // Callbacks run with no borrow held, so they may read or write any cell,
    // this one included. A write from inside a callback starts a newer
    // fan-out that reaches every listener; the older one stops there.
    fn notify(&self) {
        let (value, version, listeners) = {
            let inner = self.inner.borrow();
            (inner.value.clone(), inner.version, inner.listeners.clone())
        };

        for listener in listeners {
            if self.inner.borrow().version != version {
                break;
            }
            if listener.active.get() {
                (listener.callback)(&value);
            }
        }
    }
}

/// Read side of an [`Observable`], handed to consumers of derived values.
#[derive(Clone, Debug)]
pub struct ReadOnly<T> {
    source: Observable<T>,
}

impl<T: Clone + PartialEq + 'static> ReadOnly<T> {
    pub fn get(&self) -> T {
        self.source.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.source.with(f)
    }

    pub fn version(&self) -> u64 {
        self.source.version()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.source.subscribe(callback)
    }
}

/// Keeps a callback registered. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribe now instead of at end of scope.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Owns the subscriptions of one consumer, releasing them all together.
#[derive(Debug, Default)]
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }
}
