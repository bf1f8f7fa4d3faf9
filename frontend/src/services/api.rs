use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    Category, CategoryId, CategoryPayload, Expense, ExpenseId, ExpensePayload, Period, User,
    UserId, UserPayload,
};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::{LedgerError, Result};

/// Request/response contract of the remote store.
///
/// Mutations report only success or failure; callers reload the affected
/// collection afterwards instead of trusting a response body.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn create_user(&self, payload: &UserPayload) -> Result<()>;
    async fn update_user(&self, id: UserId, payload: &UserPayload) -> Result<()>;
    async fn delete_user(&self, id: UserId) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, payload: &CategoryPayload) -> Result<()>;
    async fn update_category(&self, id: CategoryId, payload: &CategoryPayload) -> Result<()>;
    async fn delete_category(&self, id: CategoryId) -> Result<()>;

    /// Expenses booked in exactly this period, filtered by the store
    async fn list_expenses(&self, period: Period) -> Result<Vec<Expense>>;
    async fn create_expense(&self, payload: &ExpensePayload) -> Result<()>;
    async fn update_expense(&self, id: ExpenseId, payload: &ExpensePayload) -> Result<()>;
    async fn delete_expense(&self, id: ExpenseId) -> Result<()>;
}

/// HTTP client for the remote store
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self::with_base_url(ClientConfig::default().base_url)
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Build a client from configuration, applying the request timeout if set
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and maps anything but a 2xx answer to an error
    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        debug!("➡️ {}", operation);
        let response = request.send().await.map_err(|e| {
            warn!("❌ {} could not complete: {}", operation, e);
            LedgerError::transport(operation, e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            body
        };
        warn!("❌ {} returned {}: {}", operation, status, message);
        Err(LedgerError::request(operation, status.as_u16(), message))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
        let response = self.send(operation, self.http.get(self.url(path))).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| LedgerError::transport(operation, format!("Failed to parse response: {}", e)))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for ApiClient {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.fetch_json("GET /users", "/users").await
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<()> {
        self.send("POST /users", self.http.post(self.url("/users")).json(payload))
            .await
            .map(drop)
    }

    async fn update_user(&self, id: UserId, payload: &UserPayload) -> Result<()> {
        let path = format!("/users/{}", id);
        self.send(&format!("PUT {}", path), self.http.put(self.url(&path)).json(payload))
            .await
            .map(drop)
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let path = format!("/users/{}", id);
        self.send(&format!("DELETE {}", path), self.http.delete(self.url(&path)))
            .await
            .map(drop)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.fetch_json("GET /categories", "/categories").await
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<()> {
        self.send("POST /categories", self.http.post(self.url("/categories")).json(payload))
            .await
            .map(drop)
    }

    async fn update_category(&self, id: CategoryId, payload: &CategoryPayload) -> Result<()> {
        let path = format!("/categories/{}", id);
        self.send(&format!("PUT {}", path), self.http.put(self.url(&path)).json(payload))
            .await
            .map(drop)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        let path = format!("/categories/{}", id);
        self.send(&format!("DELETE {}", path), self.http.delete(self.url(&path)))
            .await
            .map(drop)
    }

    async fn list_expenses(&self, period: Period) -> Result<Vec<Expense>> {
        let path = format!("/expenses?year={}&month={}", period.year(), period.month());
        self.fetch_json(&format!("GET {}", path), &path).await
    }

    async fn create_expense(&self, payload: &ExpensePayload) -> Result<()> {
        self.send("POST /expenses", self.http.post(self.url("/expenses")).json(payload))
            .await
            .map(drop)
    }

    async fn update_expense(&self, id: ExpenseId, payload: &ExpensePayload) -> Result<()> {
        let path = format!("/expenses/{}", id);
        self.send(&format!("PUT {}", path), self.http.put(self.url(&path)).json(payload))
            .await
            .map(drop)
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        let path = format!("/expenses/{}", id);
        self.send(&format!("DELETE {}", path), self.http.delete(self.url(&path)))
            .await
            .map(drop)
    }
}
