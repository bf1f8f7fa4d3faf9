use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use chrono::Datelike;

/// Server-assigned identifier of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Server-assigned identifier of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

/// Server-assigned identifier of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person expenses are recorded against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub mobile_number: String,
}

/// A spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Weak reference to a user. The store embeds the whole user object; only
/// the id is kept, names are resolved through the user cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
}

/// Weak reference to a category, resolved through the category cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
}

/// A single expense as returned by the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    /// Always numeric; numeric strings from the store are coerced
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Month of the expense (1-12)
    pub month: u32,
    pub year: i32,
    /// `None` when the store sends no user (e.g. it was removed)
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Expense {
    pub fn user_id(&self) -> Option<UserId> {
        self.user.map(|r| r.id)
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.map(|r| r.id)
    }

    /// Whether this expense was booked in the given period
    pub fn is_in(&self, period: Period) -> bool {
        self.month == period.month && self.year == period.year
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(value) => Ok(value),
        RawAmount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("amount '{}' is not a number", text))),
    }
}

/// Body for POST /users and PUT /users/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    pub mobile_number: String,
}

/// Body for POST /categories and PUT /categories/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

/// Body for POST /expenses and PUT /expenses/{id}. Always a full replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    pub name: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    pub user: UserRef,
    pub category: CategoryRef,
}

/// An accounting period: one calendar month of one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Returns `None` unless `month` is within 1-12
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { month, year })
        } else {
            None
        }
    }

    /// The current local calendar month
    pub fn current() -> Self {
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month before; `None` from January of `i32::MIN`
    pub fn previous(&self) -> Option<Self> {
        if self.month == 1 {
            self.year.checked_sub(1).map(|year| Self { month: 12, year })
        } else {
            Some(Self { month: self.month - 1, year: self.year })
        }
    }

    /// The month after; `None` from December of `i32::MAX`
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            self.year.checked_add(1).map(|year| Self { month: 1, year })
        } else {
            Some(Self { month: self.month + 1, year: self.year })
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", month_abbrev(self.month), self.year)
    }
}

/// Full English month name, "Unknown" outside 1-12
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "Unknown",
    }
}

/// Three-letter month label used in tables
pub fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan", 2 => "Feb", 3 => "Mar", 4 => "Apr",
        5 => "May", 6 => "Jun", 7 => "Jul", 8 => "Aug",
        9 => "Sep", 10 => "Oct", 11 => "Nov", 12 => "Dec",
        _ => "",
    }
}
