//! # State Module
//!
//! Client-side caches of the remote store and the controller that owns them.
//!
//! ## Responsibilities:
//! - Reference caches for users and categories
//! - The selected accounting period
//! - The expense collection for that period, reloaded after every mutation
//! - The shared create/update/delete workflow and its user-facing notifications
//!
//! ## Purpose:
//! Local state here is only ever a copy of the last fetch. Nothing is patched
//! in place; a successful mutation triggers a full reload of the owning cache.
//! State sits behind mutexes that are never held across an `.await`, so
//! independent loads and mutations can overlap.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod app_state;
pub mod ledger_store;
pub mod mutation;
pub mod notifications;
pub mod period_state;
pub mod reference_cache;

pub use app_state::LedgerApp;
pub use ledger_store::{LedgerSnapshot, LedgerStore, LoadOutcome};
pub use mutation::{EntityKind, MutationAction, MutationState, MutationWorkflow};
pub use notifications::{Notification, NotificationLevel, Notifications};
pub use period_state::PeriodSelector;
pub use reference_cache::{CategoryCache, ReferenceCache, ReferenceEntity, UserCache};

/// Locks a state mutex. A panic elsewhere cannot leave these values half
/// written (every update is a single assignment), so poisoning is ignored.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
