//! Form drafts and the validated commands built from them.
//!
//! The UI fills a draft field by field; a draft can be turned into a command
//! only through `validate()`, so every command that reaches the remote store
//! carries all of its required fields. Edits reuse the same commands: an
//! update is always a full replacement of the mutable fields.

/// Why a draft could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
    #[error("amount must be a finite number")]
    InvalidAmount,
    #[error("no month before or after year {0}")]
    YearOutOfRange(i32),
}

/// A form draft that validates into a command
pub trait FormDraft {
    type Command;

    fn validate(&self) -> Result<Self::Command, ValidationError>;
}

fn required_text(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

pub mod users {
    use super::{required_text, FormDraft, ValidationError};
    use shared::{User, UserPayload};

    /// Raw user form input
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct UserForm {
        pub username: Option<String>,
        pub mobile_number: Option<String>,
    }

    impl UserForm {
        pub fn new(username: impl Into<String>, mobile_number: impl Into<String>) -> Self {
            Self {
                username: Some(username.into()),
                mobile_number: Some(mobile_number.into()),
            }
        }

        /// Prefill an edit form from an existing user
        pub fn from_user(user: &User) -> Self {
            Self::new(user.username.clone(), user.mobile_number.clone())
        }
    }

    /// Validated create/replace command for a user
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserCommand {
        username: String,
        mobile_number: String,
    }

    impl UserCommand {
        pub fn username(&self) -> &str {
            &self.username
        }

        pub fn to_payload(&self) -> UserPayload {
            UserPayload {
                username: self.username.clone(),
                mobile_number: self.mobile_number.clone(),
            }
        }
    }

    impl FormDraft for UserForm {
        type Command = UserCommand;

        fn validate(&self) -> Result<UserCommand, ValidationError> {
            Ok(UserCommand {
                username: required_text(&self.username, "username")?,
                mobile_number: required_text(&self.mobile_number, "mobile number")?,
            })
        }
    }
}

pub mod categories {
    use super::{required_text, FormDraft, ValidationError};
    use shared::{Category, CategoryPayload};

    /// Raw category form input
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CategoryForm {
        pub name: Option<String>,
    }

    impl CategoryForm {
        pub fn new(name: impl Into<String>) -> Self {
            Self { name: Some(name.into()) }
        }

        pub fn from_category(category: &Category) -> Self {
            Self::new(category.name.clone())
        }
    }

    /// Validated create/replace command for a category
    #[derive(Debug, Clone, PartialEq)]
    pub struct CategoryCommand {
        name: String,
    }

    impl CategoryCommand {
        pub fn name(&self) -> &str {
            &self.name
        }

        pub fn to_payload(&self) -> CategoryPayload {
            CategoryPayload { name: self.name.clone() }
        }
    }

    impl FormDraft for CategoryForm {
        type Command = CategoryCommand;

        fn validate(&self) -> Result<CategoryCommand, ValidationError> {
            Ok(CategoryCommand {
                name: required_text(&self.name, "name")?,
            })
        }
    }
}

pub mod expenses {
    use super::{required, required_text, FormDraft, ValidationError};
    use shared::{CategoryId, CategoryRef, Expense, ExpensePayload, Period, UserId, UserRef};

    /// Raw expense form input. `month`/`year` come from the month picker.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ExpenseForm {
        pub name: Option<String>,
        pub amount: Option<f64>,
        pub month: Option<u32>,
        pub year: Option<i32>,
        pub user_id: Option<UserId>,
        pub category_id: Option<CategoryId>,
    }

    impl ExpenseForm {
        /// Prefill an edit form from an existing expense. Unresolved
        /// references stay empty so the user has to pick them again.
        pub fn from_expense(expense: &Expense) -> Self {
            Self {
                name: Some(expense.name.clone()),
                amount: Some(expense.amount),
                month: Some(expense.month),
                year: Some(expense.year),
                user_id: expense.user_id(),
                category_id: expense.category_id(),
            }
        }
    }

    /// Validated create/replace command for an expense
    #[derive(Debug, Clone, PartialEq)]
    pub struct ExpenseCommand {
        name: String,
        amount: f64,
        period: Period,
        user_id: UserId,
        category_id: CategoryId,
    }

    impl ExpenseCommand {
        pub fn name(&self) -> &str {
            &self.name
        }

        pub fn amount(&self) -> f64 {
            self.amount
        }

        /// The period the expense is booked in, which may differ from the
        /// period currently on screen
        pub fn period(&self) -> Period {
            self.period
        }

        pub fn to_payload(&self) -> ExpensePayload {
            ExpensePayload {
                name: self.name.clone(),
                amount: self.amount,
                month: self.period.month(),
                year: self.period.year(),
                user: UserRef { id: self.user_id },
                category: CategoryRef { id: self.category_id },
            }
        }
    }

    impl FormDraft for ExpenseForm {
        type Command = ExpenseCommand;

        fn validate(&self) -> Result<ExpenseCommand, ValidationError> {
            let name = required_text(&self.name, "name")?;
            let amount = required(self.amount, "amount")?;
            if !amount.is_finite() {
                return Err(ValidationError::InvalidAmount);
            }
            let month = required(self.month, "month")?;
            let year = required(self.year, "year")?;
            let period = Period::new(month, year).ok_or(ValidationError::MonthOutOfRange(month))?;

            Ok(ExpenseCommand {
                name,
                amount,
                period,
                user_id: required(self.user_id, "user")?,
                category_id: required(self.category_id, "category")?,
            })
        }
    }
}
