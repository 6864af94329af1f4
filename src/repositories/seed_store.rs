//! Unit-of-work gateway over the roles, categories and users collections.
//!
//! Writes handed to [`EntityStore::add_roles`] and [`EntityStore::add_categories`]
//! are only staged; nothing reaches the database until [`EntityStore::commit`],
//! which flushes every staged row inside one transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, NotSet, TransactionTrait,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::entities::{category, role};
use crate::repositories::role_repository::RoleRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("write rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub display_order: i32,
}

/// Rows written by one successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub roles: usize,
    pub categories: usize,
}

impl CommitSummary {
    pub fn total(&self) -> usize {
        self.roles + self.categories
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Durable roles only; staged rows are not visible here.
    async fn query_roles(&self) -> Result<Vec<role::Model>, StoreError>;

    async fn add_roles(&self, batch: Vec<NewRole>) -> Result<(), StoreError>;

    async fn add_categories(&self, batch: Vec<NewCategory>) -> Result<(), StoreError>;

    async fn commit(&self) -> Result<CommitSummary, StoreError>;

    /// Drops everything staged since the last commit.
    async fn discard(&self);
}

#[derive(Debug, Default)]
struct PendingWrites {
    roles: Vec<NewRole>,
    categories: Vec<NewCategory>,
}

impl PendingWrites {
    fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.categories.is_empty()
    }
}

/// SeaORM-backed [`EntityStore`]. Clones share the same pending buffer.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    pending: Arc<Mutex<PendingWrites>>,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            pending: Arc::new(Mutex::new(PendingWrites::default())),
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn is_role_staged(&self, name: &str) -> bool {
        self.pending.lock().await.roles.iter().any(|r| r.name == name)
    }
}

#[async_trait]
impl EntityStore for SeaOrmStore {
    async fn query_roles(&self) -> Result<Vec<role::Model>, StoreError> {
        Ok(RoleRepository::all(&self.db).await?)
    }

    async fn add_roles(&self, batch: Vec<NewRole>) -> Result<(), StoreError> {
        if let Some(blank) = batch.iter().find(|r| r.name.trim().is_empty()) {
            return Err(StoreError::Rejected(format!("role name {:?} is blank", blank.name)));
        }
        self.pending.lock().await.roles.extend(batch);
        Ok(())
    }

    async fn add_categories(&self, batch: Vec<NewCategory>) -> Result<(), StoreError> {
        if let Some(blank) = batch.iter().find(|c| c.name.trim().is_empty()) {
            return Err(StoreError::Rejected(format!("category name {:?} is blank", blank.name)));
        }
        self.pending.lock().await.categories.extend(batch);
        Ok(())
    }

    async fn commit(&self) -> Result<CommitSummary, StoreError> {
        let pending = std::mem::take(&mut *self.pending.lock().await);
        if pending.is_empty() {
            return Ok(CommitSummary::default());
        }

        let summary = CommitSummary {
            roles: pending.roles.len(),
            categories: pending.categories.len(),
        };

        let txn = self.db.begin().await?;

        if !pending.roles.is_empty() {
            let rows = pending.roles.into_iter().map(|r| role::ActiveModel {
                id: NotSet,
                public_id: Set(Uuid::now_v7()),
                name: Set(r.name),
                description: Set(r.description),
            });
            role::Entity::insert_many(rows).exec(&txn).await?;
        }

        if !pending.categories.is_empty() {
            let rows = pending.categories.into_iter().map(|c| category::ActiveModel {
                id: NotSet,
                public_id: Set(Uuid::now_v7()),
                name: Set(c.name),
                display_order: Set(c.display_order),
            });
            category::Entity::insert_many(rows).exec(&txn).await?;
        }

        txn.commit().await?;
        tracing::debug!(
            roles = summary.roles,
            categories = summary.categories,
            "Flushed staged writes"
        );
        Ok(summary)
    }

    async fn discard(&self) {
        let mut pending = self.pending.lock().await;
        if !pending.is_empty() {
            tracing::debug!(
                roles = pending.roles.len(),
                categories = pending.categories.len(),
                "Discarding staged writes"
            );
        }
        *pending = PendingWrites::default();
    }
}
