//! In-process stub of the remote store for integration tests.
//!
//! Serves the same routes as the real store on a random local port. Expenses
//! are returned with the full user and category objects embedded, and the
//! `year`/`month` filter is applied on the server side.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use expense_tracker::ApiClient;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{
    Category, CategoryId, CategoryPayload, ExpenseId, ExpensePayload, User, UserId, UserPayload,
};

struct StoredExpense {
    id: ExpenseId,
    payload: ExpensePayload,
}

#[derive(Default)]
struct StubData {
    users: Vec<User>,
    categories: Vec<Category>,
    expenses: Vec<StoredExpense>,
    next_id: i64,
}

impl StubData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn expense_json(&self, expense: &StoredExpense) -> Value {
        let user = self.users.iter().find(|u| u.id == expense.payload.user.id);
        let category = self.categories.iter().find(|c| c.id == expense.payload.category.id);
        json!({
            "id": expense.id,
            "name": expense.payload.name,
            "amount": expense.payload.amount,
            "month": expense.payload.month,
            "year": expense.payload.year,
            "user": user,
            "category": category,
        })
    }
}

#[derive(Default)]
struct StubState {
    data: Mutex<StubData>,
    failure: Mutex<Option<(StatusCode, String)>>,
    requests: AtomicUsize,
}

type Shared = Arc<StubState>;

fn data(state: &StubState) -> std::sync::MutexGuard<'_, StubData> {
    state.data.lock().unwrap()
}

pub struct StubServer {
    pub base_url: String,
    state: Shared,
}

impl StubServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(StubState::default());

        let app = Router::new()
            .route("/users", get(list_users).post(create_user))
            .route("/users/:id", put(update_user).delete(delete_user))
            .route("/categories", get(list_categories).post(create_category))
            .route("/categories/:id", put(update_category).delete(delete_category))
            .route("/expenses", get(list_expenses).post(create_expense))
            .route("/expenses/:id", put(update_expense).delete(delete_expense))
            .layer(middleware::from_fn_with_state(state.clone(), count_and_fail))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(&self.base_url)
    }

    pub fn seed_user(&self, username: &str, mobile_number: &str) -> UserId {
        let mut data = data(&self.state);
        let id = UserId(data.next_id());
        data.users.push(User {
            id,
            username: username.to_string(),
            mobile_number: mobile_number.to_string(),
        });
        id
    }

    pub fn seed_category(&self, name: &str) -> CategoryId {
        let mut data = data(&self.state);
        let id = CategoryId(data.next_id());
        data.categories.push(Category { id, name: name.to_string() });
        id
    }

    pub fn seed_expense(
        &self,
        name: &str,
        amount: f64,
        month: u32,
        year: i32,
        user: UserId,
        category: CategoryId,
    ) -> ExpenseId {
        let mut data = data(&self.state);
        let id = ExpenseId(data.next_id());
        data.expenses.push(StoredExpense {
            id,
            payload: ExpensePayload {
                name: name.to_string(),
                amount,
                month,
                year,
                user: shared::UserRef { id: user },
                category: shared::CategoryRef { id: category },
            },
        });
        id
    }

    /// Every request fails with `status` until [`StubServer::recover`]
    pub fn fail_with(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).unwrap();
        *self.state.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn recover(&self) {
        *self.state.failure.lock().unwrap() = None;
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn expense_count(&self) -> usize {
        data(&self.state).expenses.len()
    }
}

async fn count_and_fail(State(state): State<Shared>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let failure = state.failure.lock().unwrap().clone();
    match failure {
        Some((status, message)) => (status, message).into_response(),
        None => next.run(request).await,
    }
}

async fn list_users(State(state): State<Shared>) -> Json<Vec<User>> {
    Json(data(&state).users.clone())
}

async fn create_user(State(state): State<Shared>, Json(payload): Json<UserPayload>) -> StatusCode {
    let mut data = data(&state);
    let id = UserId(data.next_id());
    data.users.push(User {
        id,
        username: payload.username,
        mobile_number: payload.mobile_number,
    });
    StatusCode::CREATED
}

async fn update_user(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> StatusCode {
    let mut data = data(&state);
    match data.users.iter_mut().find(|u| u.id == UserId(id)) {
        Some(user) => {
            user.username = payload.username;
            user.mobile_number = payload.mobile_number;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_user(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    data(&state).users.retain(|u| u.id != UserId(id));
    StatusCode::NO_CONTENT
}

async fn list_categories(State(state): State<Shared>) -> Json<Vec<Category>> {
    Json(data(&state).categories.clone())
}

async fn create_category(State(state): State<Shared>, Json(payload): Json<CategoryPayload>) -> StatusCode {
    let mut data = data(&state);
    let id = CategoryId(data.next_id());
    data.categories.push(Category { id, name: payload.name });
    StatusCode::CREATED
}

async fn update_category(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryPayload>,
) -> StatusCode {
    let mut data = data(&state);
    match data.categories.iter_mut().find(|c| c.id == CategoryId(id)) {
        Some(category) => {
            category.name = payload.name;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_category(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    data(&state).categories.retain(|c| c.id != CategoryId(id));
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct PeriodQuery {
    year: i32,
    month: u32,
}

async fn list_expenses(State(state): State<Shared>, Query(query): Query<PeriodQuery>) -> Json<Vec<Value>> {
    let data = data(&state);
    let expenses = data
        .expenses
        .iter()
        .filter(|e| e.payload.month == query.month && e.payload.year == query.year)
        .map(|e| data.expense_json(e))
        .collect();
    Json(expenses)
}

async fn create_expense(State(state): State<Shared>, Json(payload): Json<ExpensePayload>) -> StatusCode {
    let mut data = data(&state);
    let id = ExpenseId(data.next_id());
    data.expenses.push(StoredExpense { id, payload });
    StatusCode::CREATED
}

async fn update_expense(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> StatusCode {
    let mut data = data(&state);
    match data.expenses.iter_mut().find(|e| e.id == ExpenseId(id)) {
        Some(expense) => {
            expense.payload = payload;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_expense(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    data(&state).expenses.retain(|e| e.id != ExpenseId(id));
    StatusCode::NO_CONTENT
}
