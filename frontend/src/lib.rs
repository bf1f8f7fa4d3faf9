//! # Expense Tracker
//!
//! Client core of a period-scoped expense ledger. The remote store is the
//! single source of truth; this crate keeps read caches of it (users,
//! categories, the expenses of one selected month) and reloads them after
//! every successful mutation.
//!
//! - **config**: YAML/env client configuration
//! - **domain**: validation, aggregation and the ledger view, no I/O
//! - **errors**: the `LedgerError` taxonomy
//! - **services**: the `RemoteStore` seam, its HTTP client, logging setup
//! - **state**: caches, period selector, mutation workflow, `LedgerApp`

pub mod config;
pub mod domain;
pub mod errors;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use config::ClientConfig;
pub use errors::{LedgerError, Result};
pub use services::{ApiClient, RemoteStore};
pub use state::LedgerApp;
