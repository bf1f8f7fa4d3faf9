//! # App State Module
//!
//! The ledger controller: the single owner of every client-side cache.
//!
//! ## Key Types:
//! - `LedgerApp` - store handle, reference caches, period selector, ledger
//!   and notification queue
//!
//! ## Key Functions:
//! - `initialize()` - first load of users, categories and the current period
//! - `set_period()` / `previous_period()` / `next_period()` - period changes,
//!   each followed by a ledger reload
//! - `submit_*` / `edit_*` / `delete_*` - validated mutations per entity
//! - `view()` - display projection of the current ledger
//!
//! ## State Management:
//! Every operation takes `&self`, so a period change and a mutation may be
//! in flight together. User and category mutations reload only their own
//! cache; expense rows pick up renamed references at the next `view()`.

use std::sync::Arc;

use shared::{CategoryId, ExpenseId, Period, UserId};
use tracing::{info, warn};

use super::ledger_store::{LedgerStore, LoadOutcome};
use super::mutation::VALIDATION_MESSAGE;
use super::notifications::{Notification, Notifications};
use super::period_state::PeriodSelector;
use super::reference_cache::{CategoryCache, UserCache};
use crate::domain::commands::categories::CategoryForm;
use crate::domain::commands::expenses::ExpenseForm;
use crate::domain::commands::users::UserForm;
use crate::domain::commands::ValidationError;
use crate::domain::ledger_view::LedgerView;
use crate::errors::{LedgerError, Result};
use crate::services::api::RemoteStore;

pub struct LedgerApp {
    users: UserCache,
    categories: CategoryCache,
    selector: PeriodSelector,
    ledger: LedgerStore,
    notifications: Notifications,
}

impl LedgerApp {
    /// Starts at the current calendar month
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self::with_period(store, Period::current())
    }

    pub fn with_period(store: Arc<dyn RemoteStore>, period: Period) -> Self {
        let notifications = Notifications::new();
        let selector = PeriodSelector::starting_at(period);
        Self {
            users: UserCache::users(store.clone(), notifications.clone()),
            categories: CategoryCache::categories(store.clone(), notifications.clone()),
            ledger: LedgerStore::new(store, selector.clone(), notifications.clone()),
            selector,
            notifications,
        }
    }

    pub fn users(&self) -> &UserCache {
        &self.users
    }

    pub fn categories(&self) -> &CategoryCache {
        &self.categories
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn selector(&self) -> &PeriodSelector {
        &self.selector
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Loads users, categories and the selected period concurrently. Each
    /// load fails on its own; the first failure is returned after all three
    /// have finished.
    pub async fn initialize(&self) -> Result<()> {
        info!("🚀 Initializing ledger for {}", self.selector.current());
        let (users, categories, expenses) =
            tokio::join!(self.users.load(), self.categories.load(), self.ledger.reload());

        users?;
        categories?;
        expenses?;
        Ok(())
    }

    /// Selects a period from raw month/year input and reloads the ledger
    pub async fn set_period(&self, month: u32, year: i32) -> Result<LoadOutcome> {
        let Some(period) = Period::new(month, year) else {
            return Err(self.reject_period(ValidationError::MonthOutOfRange(month)));
        };
        self.select_period(period).await
    }

    pub async fn select_period(&self, period: Period) -> Result<LoadOutcome> {
        self.selector.set(period);
        self.ledger.load_for_period(period).await
    }

    pub async fn previous_period(&self) -> Result<LoadOutcome> {
        let year = self.selector.current().year();
        let Some(period) = self.selector.previous() else {
            return Err(self.reject_period(ValidationError::YearOutOfRange(year)));
        };
        self.ledger.load_for_period(period).await
    }

    pub async fn next_period(&self) -> Result<LoadOutcome> {
        let year = self.selector.current().year();
        let Some(period) = self.selector.next() else {
            return Err(self.reject_period(ValidationError::YearOutOfRange(year)));
        };
        self.ledger.load_for_period(period).await
    }

    fn reject_period(&self, error: ValidationError) -> LedgerError {
        warn!("⚠️ Rejected period change: {}", error);
        self.notifications.error(VALIDATION_MESSAGE);
        LedgerError::Validation(error)
    }

    pub async fn submit_user(&self, form: &UserForm) -> Result<()> {
        let command = self.users.workflow().validate(form)?;
        self.users.create(&command).await
    }

    pub async fn edit_user(&self, id: UserId, form: &UserForm) -> Result<()> {
        let command = self.users.workflow().validate(form)?;
        self.users.update(id, &command).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        self.users.delete(id).await
    }

    pub async fn submit_category(&self, form: &CategoryForm) -> Result<()> {
        let command = self.categories.workflow().validate(form)?;
        self.categories.create(&command).await
    }

    pub async fn edit_category(&self, id: CategoryId, form: &CategoryForm) -> Result<()> {
        let command = self.categories.workflow().validate(form)?;
        self.categories.update(id, &command).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.categories.delete(id).await
    }

    pub async fn submit_expense(&self, form: &ExpenseForm) -> Result<()> {
        let command = self.ledger.workflow().validate(form)?;
        self.ledger.create(&command).await
    }

    pub async fn edit_expense(&self, id: ExpenseId, form: &ExpenseForm) -> Result<()> {
        let command = self.ledger.workflow().validate(form)?;
        self.ledger.update(id, &command).await
    }

    pub async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        self.ledger.delete(id).await
    }

    pub fn view(&self) -> LedgerView {
        LedgerView::build(
            &self.ledger.snapshot(),
            &self.users.list_all(),
            &self.categories.list_all(),
        )
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }
}
