//! Display-ready projection of the ledger for one period.

use shared::{month_abbrev, Category, Expense, ExpenseId, Period, User};

use crate::domain::aggregation::{category_names, user_names, LedgerSummary, UNKNOWN_LABEL};
use crate::state::ledger_store::LedgerSnapshot;

/// A row of the expense table with references resolved to names
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub user: String,
    pub category: String,
    pub name: String,
    pub amount: f64,
    pub month_label: &'static str,
    pub year: i32,
}

/// What the view should render for the current period
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    /// Nothing fetched yet or a load is running; no "no data" message yet
    Loading,
    /// The period has no expenses
    Empty { message: String },
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerView {
    pub period: Option<Period>,
    pub status: ViewStatus,
    pub rows: Vec<ExpenseRow>,
    pub summary: LedgerSummary,
}

/// Message shown in place of empty tables
pub fn empty_period_message(period: Period) -> String {
    format!(
        "No expenses added for the selected month ({}). Please add expense or change month and year to see previously added expense.",
        period
    )
}

impl LedgerView {
    /// Builds the view from the ledger snapshot. Rows are re-derived from the
    /// period the collection was fetched for, never from the selector, so the
    /// table and the store cannot disagree.
    pub fn build(snapshot: &LedgerSnapshot, users: &[User], categories: &[Category]) -> Self {
        let Some(period) = snapshot.period else {
            return Self {
                period: None,
                status: ViewStatus::Loading,
                rows: Vec::new(),
                summary: LedgerSummary::default(),
            };
        };

        let visible: Vec<Expense> = snapshot
            .expenses
            .iter()
            .filter(|expense| expense.is_in(period))
            .cloned()
            .collect();

        let user_lookup = user_names(users);
        let category_lookup = category_names(categories);
        let rows = visible
            .iter()
            .map(|expense| ExpenseRow {
                id: expense.id,
                user: expense
                    .user_id()
                    .and_then(|id| user_lookup.get(&id).copied())
                    .unwrap_or(UNKNOWN_LABEL)
                    .to_string(),
                category: expense
                    .category_id()
                    .and_then(|id| category_lookup.get(&id).copied())
                    .unwrap_or(UNKNOWN_LABEL)
                    .to_string(),
                name: expense.name.clone(),
                amount: expense.amount,
                month_label: month_abbrev(expense.month),
                year: expense.year,
            })
            .collect::<Vec<_>>();

        let status = if snapshot.loading {
            ViewStatus::Loading
        } else if rows.is_empty() {
            ViewStatus::Empty {
                message: empty_period_message(period),
            }
        } else {
            ViewStatus::Ready
        };

        Self {
            period: Some(period),
            status,
            rows,
            summary: LedgerSummary::compute(&visible, users, categories),
        }
    }
}
