//! The expense collection for the selected period.
//!
//! The collection is exactly the store's answer for the most recently
//! requested period. Mutations go to the store and are followed by a full
//! reload of the selector's current period; the collection is never patched
//! locally.
//!
//! Overlapping loads: every load takes a ticket and only the response to the
//! newest ticket is applied. An older response that arrives late is dropped
//! instead of overwriting the newer period's data.

use std::sync::{Arc, Mutex};

use shared::{Expense, ExpenseId, Period};
use tracing::{debug, error, info};

use super::lock;
use super::mutation::{EntityKind, MutationAction, MutationWorkflow};
use super::notifications::Notifications;
use super::period_state::PeriodSelector;
use crate::domain::commands::expenses::ExpenseCommand;
use crate::errors::Result;
use crate::services::api::RemoteStore;

/// Point-in-time copy of the ledger for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    /// Period the collection was fetched for; `None` before the first load
    pub period: Option<Period>,
    pub expenses: Vec<Expense>,
    pub loading: bool,
}

/// What happened to a load's response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was issued before this one finished; its response was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct LedgerState {
    period: Option<Period>,
    expenses: Vec<Expense>,
    loading: bool,
    latest_ticket: u64,
}

pub struct LedgerStore {
    store: Arc<dyn RemoteStore>,
    selector: PeriodSelector,
    state: Mutex<LedgerState>,
    notifications: Notifications,
    workflow: MutationWorkflow,
}

impl LedgerStore {
    pub fn new(store: Arc<dyn RemoteStore>, selector: PeriodSelector, notifications: Notifications) -> Self {
        Self {
            store,
            selector,
            state: Mutex::new(LedgerState::default()),
            workflow: MutationWorkflow::new(EntityKind::Expense, notifications.clone()),
            notifications,
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = lock(&self.state);
        LedgerSnapshot {
            period: state.period,
            expenses: state.expenses.clone(),
            loading: state.loading,
        }
    }

    pub fn expenses(&self) -> Vec<Expense> {
        lock(&self.state).expenses.clone()
    }

    /// Period of the current collection
    pub fn period(&self) -> Option<Period> {
        lock(&self.state).period
    }

    /// True while the most recently issued load is running
    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn workflow(&self) -> &MutationWorkflow {
        &self.workflow
    }

    /// Fetches the period's expenses and replaces the collection with them.
    /// On failure the previous collection is kept.
    pub async fn load_for_period(&self, period: Period) -> Result<LoadOutcome> {
        let ticket = {
            let mut state = lock(&self.state);
            state.latest_ticket += 1;
            state.loading = true;
            state.latest_ticket
        };
        info!("📅 Loading expenses for {}", period);

        let result = self.store.list_expenses(period).await;

        let mut state = lock(&self.state);
        if state.latest_ticket != ticket {
            debug!("⏭️ Dropping stale expenses response for {} (ticket {} < {})", period, ticket, state.latest_ticket);
            return Ok(LoadOutcome::Superseded);
        }
        state.loading = false;

        match result {
            Ok(expenses) => {
                let count = expenses.len();
                state.period = Some(period);
                state.expenses = expenses;
                info!("📊 Loaded {} expenses for {}", count, period);
                Ok(LoadOutcome::Applied { count })
            }
            Err(e) => {
                drop(state);
                error!("❌ Failed to fetch expenses for {}: {}", period, e);
                self.notifications.error(EntityKind::Expense.fetch_failure_message(&e));
                Err(e)
            }
        }
    }

    /// Reloads the selector's current period. Every successful expense
    /// mutation awaits this before it is considered complete.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        self.load_for_period(self.selector.current()).await
    }

    /// Creates an expense, then reloads the *current* period. An expense
    /// booked in another month shows up once that month is selected.
    pub async fn create(&self, command: &ExpenseCommand) -> Result<()> {
        let payload = command.to_payload();
        self.workflow
            .execute(MutationAction::Create, self.store.create_expense(&payload), || async {
                self.reload().await.map(drop)
            })
            .await
    }

    /// Full replacement of the expense's fields
    pub async fn update(&self, id: ExpenseId, command: &ExpenseCommand) -> Result<()> {
        let payload = command.to_payload();
        self.workflow
            .execute(MutationAction::Update, self.store.update_expense(id, &payload), || async {
                self.reload().await.map(drop)
            })
            .await
    }

    pub async fn delete(&self, id: ExpenseId) -> Result<()> {
        self.workflow
            .execute(MutationAction::Delete, self.store.delete_expense(id), || async {
                self.reload().await.map(drop)
            })
            .await
    }
}
