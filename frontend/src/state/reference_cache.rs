//! Caches of the reference entities (users, categories).
//!
//! Each load is a full replace in the order the store returns; there is no
//! incremental update. A failed load leaves the previous contents in place.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shared::{Category, CategoryId, User, UserId};
use tracing::{error, info};

use super::lock;
use super::mutation::{EntityKind, InFlight, MutationAction, MutationWorkflow};
use super::notifications::Notifications;
use crate::domain::commands::categories::CategoryCommand;
use crate::domain::commands::users::UserCommand;
use crate::errors::Result;
use crate::services::api::RemoteStore;

/// An entity that expenses refer to by id
pub trait ReferenceEntity: Clone + Send + Sync {
    type Id: Copy + PartialEq;

    fn id(&self) -> Self::Id;
    fn display_name(&self) -> &str;
}

impl ReferenceEntity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.username
    }
}

impl ReferenceEntity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

pub struct ReferenceCache<T> {
    store: Arc<dyn RemoteStore>,
    entries: Mutex<Vec<T>>,
    /// Loads in flight; overlapping loads each hold one count
    loading: AtomicUsize,
    notifications: Notifications,
    workflow: MutationWorkflow,
}

pub type UserCache = ReferenceCache<User>;
pub type CategoryCache = ReferenceCache<Category>;

impl<T: ReferenceEntity> ReferenceCache<T> {
    fn new(kind: EntityKind, store: Arc<dyn RemoteStore>, notifications: Notifications) -> Self {
        Self {
            store,
            entries: Mutex::new(Vec::new()),
            loading: AtomicUsize::new(0),
            workflow: MutationWorkflow::new(kind, notifications.clone()),
            notifications,
        }
    }

    /// Last-loaded collection; empty before the first load
    pub fn list_all(&self) -> Vec<T> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while at least one load is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn get(&self, id: T::Id) -> Option<T> {
        lock(&self.entries).iter().find(|entry| entry.id() == id).cloned()
    }

    /// Display name for an id; `None` when the reference does not resolve
    pub fn resolve_name(&self, id: T::Id) -> Option<String> {
        self.get(id).map(|entry| entry.display_name().to_string())
    }

    pub fn workflow(&self) -> &MutationWorkflow {
        &self.workflow
    }

    async fn replace_with<F>(&self, fetch: F) -> Result<usize>
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        let kind = self.workflow.entity();
        let result = {
            let _loading = InFlight::enter(&self.loading);
            fetch.await
        };

        match result {
            Ok(entries) => {
                let count = entries.len();
                *lock(&self.entries) = entries;
                info!("📋 Loaded {} {}", count, kind.plural());
                Ok(count)
            }
            Err(e) => {
                error!("❌ Failed to fetch {}: {}", kind.plural(), e);
                self.notifications.error(kind.fetch_failure_message(&e));
                Err(e)
            }
        }
    }
}

impl ReferenceCache<User> {
    pub fn users(store: Arc<dyn RemoteStore>, notifications: Notifications) -> Self {
        Self::new(EntityKind::User, store, notifications)
    }

    /// Replaces the cache with the store's current users
    pub async fn load(&self) -> Result<usize> {
        self.replace_with(self.store.list_users()).await
    }

    pub async fn create(&self, command: &UserCommand) -> Result<()> {
        let payload = command.to_payload();
        self.workflow
            .execute(MutationAction::Create, self.store.create_user(&payload), || async {
                self.load().await.map(drop)
            })
            .await
    }

    /// Full replacement of the user's fields
    pub async fn update(&self, id: UserId, command: &UserCommand) -> Result<()> {
        let payload = command.to_payload();
        self.workflow
            .execute(MutationAction::Update, self.store.update_user(id, &payload), || async {
                self.load().await.map(drop)
            })
            .await
    }

    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.workflow
            .execute(MutationAction::Delete, self.store.delete_user(id), || async {
                self.load().await.map(drop)
            })
            .await
    }
}

impl ReferenceCache<Category> {
    pub fn categories(store: Arc<dyn RemoteStore>, notifications: Notifications) -> Self {
        Self::new(EntityKind::Category, store, notifications)
    }

    /// Replaces the cache with the store's current categories
    pub async fn load(&self) -> Result<usize> {
        self.replace_with(self.store.list_categories()).await
    }

    pub async fn create(&self, command: &CategoryCommand) -> Result<()> {
        let payload = command.to_payload();
        self.workflow
            .execute(MutationAction::Create, self.store.create_category(&payload), || async {
                self.load().await.map(drop)
            })
            .await
    }

    /// Full replacement of the category's fields
    pub async fn update(&self, id: CategoryId, command: &CategoryCommand) -> Result<()> {
        let payload = command.to_payload();
        self.workflow
            .execute(MutationAction::Update, self.store.update_category(id, &payload), || async {
                self.load().await.map(drop)
            })
            .await
    }

    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        self.workflow
            .execute(MutationAction::Delete, self.store.delete_category(id), || async {
                self.load().await.map(drop)
            })
            .await
    }
}
