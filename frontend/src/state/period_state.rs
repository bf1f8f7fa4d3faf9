//! The selected accounting period.
//!
//! The selector only says which period the ledger and the aggregates are
//! scoped to. It never fetches; whoever changes it must reload the ledger.

use std::sync::{Arc, Mutex};

use shared::Period;
use tracing::info;

use super::lock;

/// Currently selected (month, year). Clones share the same selection.
#[derive(Debug, Clone)]
pub struct PeriodSelector {
    current: Arc<Mutex<Period>>,
}

impl PeriodSelector {
    /// Starts at the current calendar month
    pub fn new() -> Self {
        Self::starting_at(Period::current())
    }

    pub fn starting_at(period: Period) -> Self {
        Self {
            current: Arc::new(Mutex::new(period)),
        }
    }

    pub fn current(&self) -> Period {
        *lock(&self.current)
    }

    /// Replaces the selection; the previous period is discarded
    pub fn set(&self, period: Period) {
        *lock(&self.current) = period;
        info!("📅 Selected period {}", period);
    }

    /// Steps back one month and returns the new selection. At the earliest
    /// representable month the selection is left as is and `None` returned.
    pub fn previous(&self) -> Option<Period> {
        let mut current = lock(&self.current);
        let previous = current.previous()?;
        *current = previous;
        info!("📅 Navigated to previous month: {}", previous);
        Some(previous)
    }

    /// Steps forward one month and returns the new selection. At the latest
    /// representable month the selection is left as is and `None` returned.
    pub fn next(&self) -> Option<Period> {
        let mut current = lock(&self.current);
        let next = current.next()?;
        *current = next;
        info!("📅 Navigated to next month: {}", next);
        Some(next)
    }
}

impl Default for PeriodSelector {
    fn default() -> Self {
        Self::new()
    }
}
