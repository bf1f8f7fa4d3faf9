//! In-memory remote store for unit tests.
//!
//! Behaves like the real store: server-assigned ids, expenses filtered by
//! period on the server side, full replacement on update. Tests can inject a
//! one-shot failure and hold list calls until released.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::{
    Category, CategoryId, CategoryPayload, CategoryRef, Expense, ExpenseId, ExpensePayload, Period,
    User, UserId, UserPayload, UserRef,
};
use tokio::sync::Notify;

use crate::errors::{LedgerError, Result};
use crate::services::api::RemoteStore;
use crate::state::lock;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    expenses: Vec<Expense>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_next: Mutex<Option<LedgerError>>,
    gates: Mutex<HashMap<Period, Arc<Notify>>>,
    user_gates: Mutex<VecDeque<Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, username: &str, mobile_number: &str) -> UserId {
        let mut tables = lock(&self.tables);
        let id = UserId(tables.next_id());
        tables.users.push(User {
            id,
            username: username.to_string(),
            mobile_number: mobile_number.to_string(),
        });
        id
    }

    pub fn seed_category(&self, name: &str) -> CategoryId {
        let mut tables = lock(&self.tables);
        let id = CategoryId(tables.next_id());
        tables.categories.push(Category { id, name: name.to_string() });
        id
    }

    pub fn seed_expense(
        &self,
        name: &str,
        amount: f64,
        period: Period,
        user: UserId,
        category: CategoryId,
    ) -> ExpenseId {
        let mut tables = lock(&self.tables);
        let id = ExpenseId(tables.next_id());
        tables.expenses.push(Expense {
            id,
            name: name.to_string(),
            amount,
            month: period.month(),
            year: period.year(),
            user: Some(UserRef { id: user }),
            category: Some(CategoryRef { id: category }),
        });
        id
    }

    /// The next store call fails with `error`
    pub fn fail_next(&self, error: LedgerError) {
        *lock(&self.fail_next) = Some(error);
    }

    /// The next `list_expenses` for `period` waits until the returned gate is
    /// notified
    pub fn hold_period(&self, period: Period) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.gates).insert(period, gate.clone());
        gate
    }

    /// Each `list_users` call takes the oldest pending gate and waits until it
    /// is notified
    pub fn hold_users(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.user_gates).push_back(gate.clone());
        gate
    }

    /// Every call received, e.g. `"GET /users"`, oldest first
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of list calls received
    pub fn list_calls(&self) -> usize {
        lock(&self.calls).iter().filter(|call| call.starts_with("GET")).count()
    }

    fn begin(&self, operation: String) -> Result<()> {
        lock(&self.calls).push(operation);
        match lock(&self.fail_next).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found(operation: &str) -> LedgerError {
        LedgerError::request(operation, 404, "Not Found")
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.begin("GET /users".to_string())?;

        let gate = lock(&self.user_gates).pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(lock(&self.tables).users.clone())
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<()> {
        self.begin("POST /users".to_string())?;
        let mut tables = lock(&self.tables);
        let id = UserId(tables.next_id());
        tables.users.push(User {
            id,
            username: payload.username.clone(),
            mobile_number: payload.mobile_number.clone(),
        });
        Ok(())
    }

    async fn update_user(&self, id: UserId, payload: &UserPayload) -> Result<()> {
        let operation = format!("PUT /users/{}", id);
        self.begin(operation.clone())?;
        let mut tables = lock(&self.tables);
        let user = tables
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| Self::not_found(&operation))?;
        user.username = payload.username.clone();
        user.mobile_number = payload.mobile_number.clone();
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        self.begin(format!("DELETE /users/{}", id))?;
        lock(&self.tables).users.retain(|user| user.id != id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.begin("GET /categories".to_string())?;
        Ok(lock(&self.tables).categories.clone())
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<()> {
        self.begin("POST /categories".to_string())?;
        let mut tables = lock(&self.tables);
        let id = CategoryId(tables.next_id());
        tables.categories.push(Category { id, name: payload.name.clone() });
        Ok(())
    }

    async fn update_category(&self, id: CategoryId, payload: &CategoryPayload) -> Result<()> {
        let operation = format!("PUT /categories/{}", id);
        self.begin(operation.clone())?;
        let mut tables = lock(&self.tables);
        let category = tables
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| Self::not_found(&operation))?;
        category.name = payload.name.clone();
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.begin(format!("DELETE /categories/{}", id))?;
        lock(&self.tables).categories.retain(|category| category.id != id);
        Ok(())
    }

    async fn list_expenses(&self, period: Period) -> Result<Vec<Expense>> {
        self.begin(format!("GET /expenses?year={}&month={}", period.year(), period.month()))?;

        let gate = lock(&self.gates).remove(&period);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(lock(&self.tables)
            .expenses
            .iter()
            .filter(|expense| expense.is_in(period))
            .cloned()
            .collect())
    }

    async fn create_expense(&self, payload: &ExpensePayload) -> Result<()> {
        self.begin("POST /expenses".to_string())?;
        let mut tables = lock(&self.tables);
        let id = ExpenseId(tables.next_id());
        tables.expenses.push(Expense {
            id,
            name: payload.name.clone(),
            amount: payload.amount,
            month: payload.month,
            year: payload.year,
            user: Some(payload.user),
            category: Some(payload.category),
        });
        Ok(())
    }

    async fn update_expense(&self, id: ExpenseId, payload: &ExpensePayload) -> Result<()> {
        let operation = format!("PUT /expenses/{}", id);
        self.begin(operation.clone())?;
        let mut tables = lock(&self.tables);
        let expense = tables
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or_else(|| Self::not_found(&operation))?;
        expense.name = payload.name.clone();
        expense.amount = payload.amount;
        expense.month = payload.month;
        expense.year = payload.year;
        expense.user = Some(payload.user);
        expense.category = Some(payload.category);
        Ok(())
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        self.begin(format!("DELETE /expenses/{}", id))?;
        lock(&self.tables).expenses.retain(|expense| expense.id != id);
        Ok(())
    }
}
