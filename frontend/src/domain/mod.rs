//! # Domain Module
//!
//! Pure ledger logic with no I/O: validated commands built from form drafts,
//! the per-user and per-category aggregation, and the display projection of
//! a period's expenses.
//!
//! - **commands**: form drafts, validation, and the commands sent to the store
//! - **aggregation**: grouped totals with a trailing grand total
//! - **ledger_view**: table rows, empty-period handling, summaries

pub mod aggregation;
pub mod commands;
pub mod ledger_view;

pub use aggregation::{AggregateRow, AggregateTable, LedgerSummary};
pub use commands::categories::{CategoryCommand, CategoryForm};
pub use commands::expenses::{ExpenseCommand, ExpenseForm};
pub use commands::users::{UserCommand, UserForm};
pub use commands::{FormDraft, ValidationError};
pub use ledger_view::{ExpenseRow, LedgerView, ViewStatus};
