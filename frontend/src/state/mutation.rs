//! The create/update/delete workflow shared by users, categories and expenses.
//!
//! `Idle -> Submitting -> Idle`. Validation happens before the workflow is
//! entered, so a rejected form never reaches the store. A send that succeeds
//! is not complete until the owning cache has reloaded; a send that fails is
//! reported and leaves local state untouched.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, info, warn};

use super::notifications::Notifications;
use crate::domain::commands::FormDraft;
use crate::errors::{LedgerError, Result};

/// Shown for every validation failure
pub const VALIDATION_MESSAGE: &str = "Please fill all required fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Category,
    Expense,
}

impl EntityKind {
    pub fn noun(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Category => "category",
            EntityKind::Expense => "expense",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Category => "categories",
            EntityKind::Expense => "expenses",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Category => "Category",
            EntityKind::Expense => "Expense",
        }
    }

    /// Reported when a collection could not be loaded
    pub fn fetch_failure_message(&self, error: &LedgerError) -> String {
        match error {
            LedgerError::Transport { .. } => format!("Error fetching {}", self.plural()),
            _ => format!("Failed to fetch {}", self.plural()),
        }
    }

    /// Users and categories are "added", expenses "created"
    fn verb(&self, action: MutationAction) -> &'static str {
        match (self, action) {
            (EntityKind::Expense, MutationAction::Create) => "create",
            (_, MutationAction::Create) => "add",
            (_, MutationAction::Update) => "update",
            (_, MutationAction::Delete) => "delete",
        }
    }

    fn progressive(&self, action: MutationAction) -> &'static str {
        match (self, action) {
            (EntityKind::Expense, MutationAction::Create) => "creating",
            (_, MutationAction::Create) => "adding",
            (_, MutationAction::Update) => "updating",
            (_, MutationAction::Delete) => "deleting",
        }
    }

    fn success_message(&self, action: MutationAction) -> &'static str {
        match (self, action) {
            (EntityKind::User, MutationAction::Create) => "User added successfully",
            (EntityKind::User, MutationAction::Update) => "User updated successfully",
            (EntityKind::User, MutationAction::Delete) => "User deleted successfully",
            (EntityKind::Category, MutationAction::Create) => "Category added successfully",
            (EntityKind::Category, MutationAction::Update) => "Category updated successfully",
            (EntityKind::Category, MutationAction::Delete) => "Category deleted successfully",
            (EntityKind::Expense, MutationAction::Create) => "Expense created successfully",
            (EntityKind::Expense, MutationAction::Update) => "Expense updated",
            (EntityKind::Expense, MutationAction::Delete) => "Expense deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Submitting,
}

/// Counts one in-flight operation; the count drops again even if the
/// owning future is dropped
pub(crate) struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    pub(crate) fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Workflow for one entity kind. Overlapping submissions are allowed; each
/// one triggers its own reload.
#[derive(Debug)]
pub struct MutationWorkflow {
    entity: EntityKind,
    in_flight: AtomicUsize,
    notifications: Notifications,
}

impl MutationWorkflow {
    pub fn new(entity: EntityKind, notifications: Notifications) -> Self {
        Self {
            entity,
            in_flight: AtomicUsize::new(0),
            notifications,
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// `Submitting` while at least one mutation is in flight
    pub fn state(&self) -> MutationState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            MutationState::Submitting
        } else {
            MutationState::Idle
        }
    }

    /// Turns a draft into its command, reporting a failure to the user
    pub fn validate<D: FormDraft>(&self, draft: &D) -> Result<D::Command> {
        draft.validate().map_err(|e| {
            warn!("⚠️ Rejected {} form: {}", self.entity.noun(), e);
            self.notifications.error(VALIDATION_MESSAGE);
            LedgerError::Validation(e)
        })
    }

    /// Sends a mutation and, on success, awaits `reload` before reporting
    /// completion. A failed reload is reported by the cache doing the
    /// reload; the mutation itself still counts as applied.
    pub async fn execute<S, R, F>(&self, action: MutationAction, send: S, reload: R) -> Result<()>
    where
        S: Future<Output = Result<()>>,
        R: FnOnce() -> F,
        F: Future<Output = Result<()>>,
    {
        let _in_flight = InFlight::enter(&self.in_flight);

        match send.await {
            Ok(()) => {
                info!("✅ {} {:?} done, reloading {}", self.entity.title(), action, self.entity.plural());
                if let Err(e) = reload().await {
                    warn!("⚠️ Reload after {:?} of {} failed: {}", action, self.entity.noun(), e);
                }
                self.notifications.success(self.entity.success_message(action));
                Ok(())
            }
            Err(e) => {
                error!("❌ Failed to {} {}: {}", self.entity.verb(action), self.entity.noun(), e);
                self.notifications.error(self.failure_message(action, &e));
                Err(e)
            }
        }
    }

    fn failure_message(&self, action: MutationAction, error: &LedgerError) -> String {
        let noun = self.entity.noun();
        match error {
            LedgerError::Transport { .. } => {
                format!("Error {} {}", self.entity.progressive(action), noun)
            }
            _ => format!("Failed to {} {}", self.entity.verb(action), noun),
        }
    }
}
