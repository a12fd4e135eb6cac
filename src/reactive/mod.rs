//! Single-threaded reactive cells.
//!
//! - [`Observable`]: a shared latest-value cell. New subscribers receive the
//!   current value immediately, then every later change.
//! - [`ReadOnly`]: the observe-only side of an `Observable`.
//! - [`Subscription`]: RAII guard; dropping it unsubscribes.
//! - [`SubscriptionScope`]: holds all subscriptions of one consumer so they
//!   are released together when the consumer goes away.
//! - [`BatchScope`]: RAII guard that holds back notifications until related
//!   cells have all been written.
//!
//! # Invariants
//!
//! 1. Every change is delivered synchronously before `set`/`replace` returns,
//!    or, inside a `BatchScope`, before the outermost scope is dropped.
//! 2. Subscribers are notified in registration order.
//! 3. `set` with a value equal to the current one is a no-op.
//! 4. A dropped subscription is never invoked again, even mid-notification.
//! 5. No subscriber sees an older value after a newer one.
//! 6. Within a `BatchScope` values are updated immediately, so a subscriber
//!    notified at scope exit sees every write made in the scope.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, ReadOnly, Subscription, SubscriptionScope};
