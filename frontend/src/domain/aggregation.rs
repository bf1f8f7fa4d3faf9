//! Per-user and per-category totals over a period's expenses.
//!
//! Everything here is a pure function of its inputs: the ledger collection
//! plus snapshots of the reference caches. Names are resolved at this point
//! and only here; a reference that does not resolve is grouped under
//! [`UNKNOWN_LABEL`] and still counts towards the grand total.

use std::collections::HashMap;

use shared::{Category, CategoryId, Expense, User, UserId};

/// Group key for references that do not resolve
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const ALL_USERS_LABEL: &str = "All Users";
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// One line of an aggregate table
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: String,
    pub total: f64,
}

/// Summed amounts per group plus a trailing grand total
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateTable {
    /// Groups in order of first appearance
    pub groups: Vec<AggregateRow>,
    /// `None` when there are no groups
    pub total: Option<AggregateRow>,
}

impl AggregateTable {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total for a group key, if the group exists
    pub fn get(&self, key: &str) -> Option<f64> {
        self.groups.iter().find(|row| row.key == key).map(|row| row.total)
    }

    pub fn grand_total(&self) -> Option<f64> {
        self.total.as_ref().map(|row| row.total)
    }

    /// Group rows followed by the total row, the way the table is rendered
    pub fn rows(&self) -> impl Iterator<Item = &AggregateRow> {
        self.groups.iter().chain(self.total.iter())
    }
}

/// Sums `amount` per key, keeping keys in first-appearance order
fn aggregate_by<'k, F>(expenses: &[Expense], total_label: &str, key_of: F) -> AggregateTable
where
    F: Fn(&Expense) -> &'k str,
{
    let mut groups: Vec<AggregateRow> = Vec::new();
    let mut index: HashMap<&'k str, usize> = HashMap::new();

    for expense in expenses {
        let key = key_of(expense);
        match index.get(key) {
            Some(&position) => groups[position].total += expense.amount,
            None => {
                index.insert(key, groups.len());
                groups.push(AggregateRow {
                    key: key.to_string(),
                    total: expense.amount,
                });
            }
        }
    }

    let total = if groups.is_empty() {
        None
    } else {
        Some(AggregateRow {
            key: total_label.to_string(),
            total: groups.iter().map(|row| row.total).sum(),
        })
    };

    AggregateTable { groups, total }
}

/// Display names of users by id
pub fn user_names(users: &[User]) -> HashMap<UserId, &str> {
    users.iter().map(|u| (u.id, u.username.as_str())).collect()
}

/// Display names of categories by id
pub fn category_names(categories: &[Category]) -> HashMap<CategoryId, &str> {
    categories.iter().map(|c| (c.id, c.name.as_str())).collect()
}

/// Total amount per user display name
pub fn by_user(expenses: &[Expense], users: &[User]) -> AggregateTable {
    let names = user_names(users);
    aggregate_by(expenses, ALL_USERS_LABEL, |expense| {
        expense
            .user_id()
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNKNOWN_LABEL)
    })
}

/// Total amount per category display name
pub fn by_category(expenses: &[Expense], categories: &[Category]) -> AggregateTable {
    let names = category_names(categories);
    aggregate_by(expenses, ALL_CATEGORIES_LABEL, |expense| {
        expense
            .category_id()
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNKNOWN_LABEL)
    })
}

/// Both aggregate tables for one collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerSummary {
    pub by_user: AggregateTable,
    pub by_category: AggregateTable,
}

impl LedgerSummary {
    pub fn compute(expenses: &[Expense], users: &[User], categories: &[Category]) -> Self {
        Self {
            by_user: by_user(expenses, users),
            by_category: by_category(expenses, categories),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty() && self.by_category.is_empty()
    }
}
