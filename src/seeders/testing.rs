//! In-memory store and identity manager for seeder unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::entities::{role, user};
use crate::models::account_model::{normalize, NewAccount};
use crate::repositories::seed_store::{
    CommitSummary, EntityStore, NewCategory, NewRole, StoreError,
};
use crate::services::identity_service::{AccountSetupError, IdentityError, IdentityManager};

#[derive(Default)]
pub(crate) struct State {
    pub roles: Vec<String>,
    pub categories: Vec<(String, i32)>,
    pub staged_roles: Vec<String>,
    pub staged_categories: Vec<(String, i32)>,
    pub users: Vec<user::Model>,
    pub assignments: Vec<(i64, String)>,
    /// Durable rows written: committed roles and categories, users, role links.
    pub writes: usize,
    pub calls: Vec<String>,

    pub fail_query: bool,
    pub fail_create_role: Option<String>,
    pub fail_add_categories: bool,
    pub fail_commit: bool,
    pub fail_create_account: bool,
    pub reject_passwords: bool,
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn with_roles(names: &[&str]) -> Self {
        let backend = Self::default();
        backend.state().roles = names.iter().map(|n| n.to_string()).collect();
        backend
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EntityStore for MemoryBackend {
    async fn query_roles(&self) -> Result<Vec<role::Model>, StoreError> {
        let mut state = self.state();
        state.calls.push("query_roles".to_string());
        if state.fail_query {
            return Err(StoreError::Rejected("query failed".to_string()));
        }
        Ok(state
            .roles
            .iter()
            .enumerate()
            .map(|(i, name)| role::Model {
                id: i as i64 + 1,
                public_id: Uuid::now_v7(),
                name: name.clone(),
                description: None,
            })
            .collect())
    }

    async fn add_roles(&self, batch: Vec<NewRole>) -> Result<(), StoreError> {
        let mut state = self.state();
        state.calls.push("add_roles".to_string());
        state.staged_roles.extend(batch.into_iter().map(|r| r.name));
        Ok(())
    }

    async fn add_categories(&self, batch: Vec<NewCategory>) -> Result<(), StoreError> {
        let mut state = self.state();
        state.calls.push("add_categories".to_string());
        if state.fail_add_categories {
            return Err(StoreError::Rejected("categories rejected".to_string()));
        }
        state
            .staged_categories
            .extend(batch.into_iter().map(|c| (c.name, c.display_order)));
        Ok(())
    }

    async fn commit(&self) -> Result<CommitSummary, StoreError> {
        let mut state = self.state();
        state.calls.push("commit".to_string());
        if state.fail_commit {
            state.staged_roles.clear();
            state.staged_categories.clear();
            return Err(StoreError::Rejected("commit failed".to_string()));
        }
        let roles = std::mem::take(&mut state.staged_roles);
        let categories = std::mem::take(&mut state.staged_categories);
        let summary = CommitSummary {
            roles: roles.len(),
            categories: categories.len(),
        };
        state.writes += summary.total();
        state.roles.extend(roles);
        state.categories.extend(categories);
        Ok(summary)
    }

    async fn discard(&self) {
        let mut state = self.state();
        state.calls.push("discard".to_string());
        state.staged_roles.clear();
        state.staged_categories.clear();
    }
}

#[async_trait]
impl IdentityManager for MemoryBackend {
    async fn role_exists(&self, name: &str) -> Result<bool, IdentityError> {
        let state = self.state();
        Ok(state.roles.iter().chain(&state.staged_roles).any(|r| r == name))
    }

    async fn create_role(&self, name: &str) -> Result<(), IdentityError> {
        {
            let mut state = self.state();
            state.calls.push(format!("create_role:{name}"));
            if state.fail_create_role.as_deref() == Some(name) {
                return Err(IdentityError::InvalidRoleName(name.to_string()));
            }
        }
        self.add_roles(vec![NewRole {
            name: name.to_string(),
            description: None,
        }])
        .await?;
        Ok(())
    }

    async fn create_account(
        &self,
        account: &mut NewAccount,
        _password: &str,
    ) -> Result<user::Model, IdentityError> {
        let mut state = self.state();
        state.calls.push(format!("create_account:{}", account.email));
        if state.fail_create_account {
            return Err(IdentityError::Hash("hasher unavailable".to_string()));
        }
        if state.reject_passwords {
            return Err(IdentityError::PasswordPolicy(vec![
                "Password must contain at least one digit".to_string(),
            ]));
        }
        account.normalized_email = normalize(&account.email);
        if state.users.iter().any(|u| u.normalized_email == account.normalized_email) {
            return Err(IdentityError::DuplicateEmail(account.email.clone()));
        }

        let now = Utc::now();
        let user = user::Model {
            id: state.users.len() as i64 + 1,
            public_id: Uuid::now_v7(),
            user_name: account.user_name.clone(),
            normalized_user_name: account.normalized_user_name.clone(),
            email: account.email.clone(),
            normalized_email: account.normalized_email.clone(),
            email_confirmed: account.email_confirmed,
            password_hash: "hashed".to_string(),
            name: account.name.clone(),
            phone_number: account.phone_number.clone(),
            street_address: account.street_address.clone(),
            city: account.city.clone(),
            state: account.state.clone(),
            postal_code: account.postal_code.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        state.writes += 1;
        Ok(user)
    }

    async fn assign_role(
        &self,
        account: &user::Model,
        role_name: &str,
    ) -> Result<(), IdentityError> {
        let mut state = self.state();
        state.calls.push(format!("assign_role:{role_name}"));
        if !state.roles.iter().any(|r| r == role_name) {
            return Err(IdentityError::RoleNotFound(role_name.to_string()));
        }
        state.assignments.push((account.id, role_name.to_string()));
        state.writes += 1;
        Ok(())
    }

    // Undoes the account write when the link fails, like a rolled back transaction.
    async fn create_account_with_role(
        &self,
        account: &mut NewAccount,
        password: &str,
        role_name: &str,
    ) -> Result<user::Model, AccountSetupError> {
        let user = self
            .create_account(account, password)
            .await
            .map_err(AccountSetupError::Account)?;

        if let Err(e) = self.assign_role(&user, role_name).await {
            let mut state = self.state();
            state.users.retain(|u| u.id != user.id);
            state.writes -= 1;
            return Err(AccountSetupError::RoleAssignment(e));
        }
        Ok(user)
    }

    fn set_user_name(&self, account: &mut NewAccount, user_name: &str) {
        account.user_name = user_name.to_string();
        account.normalized_user_name = normalize(user_name);
    }
}
