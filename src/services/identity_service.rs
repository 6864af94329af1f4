//! Account and role management used by the seeders.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseTransaction, DbErr, TransactionTrait};
use thiserror::Error;
use validator::Validate;

use crate::entities::{role::RoleName, user};
use crate::models::account_model::{normalize, NewAccount};
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::seed_store::{EntityStore, NewRole, SeaOrmStore, StoreError};
use crate::repositories::user_repository::UserRepository;
use crate::utils::validator_utils::{flatten_errors, password_policy_violations};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email '{0}' is already taken")]
    DuplicateEmail(String),

    #[error("user name '{0}' is already taken")]
    DuplicateUserName(String),

    #[error("role '{0}' already exists")]
    DuplicateRoleName(String),

    #[error("invalid account: {}", .0.join("; "))]
    InvalidAccount(Vec<String>),

    #[error("invalid role name '{0}'")]
    InvalidRoleName(String),

    #[error("password rejected: {}", .0.join("; "))]
    PasswordPolicy(Vec<String>),

    #[error("role '{0}' not found")]
    RoleNotFound(String),

    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl IdentityError {
    /// Conflicts with an identity that already exists.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, IdentityError::DuplicateEmail(_) | IdentityError::DuplicateUserName(_))
    }

    /// Messages for input that failed validation, `None` for any other failure.
    pub fn validation_messages(&self) -> Option<Vec<String>> {
        match self {
            IdentityError::InvalidAccount(messages) | IdentityError::PasswordPolicy(messages) => {
                Some(messages.clone())
            }
            _ => None,
        }
    }
}

/// Failure of [`IdentityManager::create_account_with_role`], split by the step
/// that failed. Nothing is persisted in either case.
#[derive(Debug, Error)]
pub enum AccountSetupError {
    #[error("account creation failed: {0}")]
    Account(#[source] IdentityError),

    #[error("role assignment failed: {0}")]
    RoleAssignment(#[source] IdentityError),
}

#[async_trait]
pub trait IdentityManager: Send + Sync {
    async fn role_exists(&self, name: &str) -> Result<bool, IdentityError>;

    async fn create_role(&self, name: &str) -> Result<(), IdentityError>;

    async fn create_account(
        &self,
        account: &mut NewAccount,
        password: &str,
    ) -> Result<user::Model, IdentityError>;

    async fn assign_role(
        &self,
        account: &user::Model,
        role_name: &str,
    ) -> Result<(), IdentityError>;

    /// Creates the account and links it to `role_name` as one unit: either
    /// both the account and the link are stored, or neither is.
    async fn create_account_with_role(
        &self,
        account: &mut NewAccount,
        password: &str,
        role_name: &str,
    ) -> Result<user::Model, AccountSetupError>;

    fn set_user_name(&self, account: &mut NewAccount, user_name: &str);
}

/// SeaORM identity manager. Role creation is staged on the shared
/// [`SeaOrmStore`] unit of work; accounts and role links persist immediately.
#[derive(Clone)]
pub struct IdentityService {
    store: SeaOrmStore,
}

impl IdentityService {
    pub fn new(store: SeaOrmStore) -> Self {
        Self { store }
    }

    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
    }

    // Validation and normalization only; touches no connection.
    fn prepare_account(
        &self,
        account: &mut NewAccount,
        password: &str,
    ) -> Result<(), IdentityError> {
        if let Err(errors) = account.validate() {
            return Err(IdentityError::InvalidAccount(flatten_errors(&errors)));
        }

        let violations = password_policy_violations(password);
        if !violations.is_empty() {
            return Err(IdentityError::PasswordPolicy(violations));
        }

        if account.user_name.trim().is_empty() {
            let email = account.email.clone();
            self.set_user_name(account, &email);
        }
        account.normalized_email = normalize(&account.email);
        Ok(())
    }

    async fn insert_account<C: ConnectionTrait>(
        db: &C,
        account: &NewAccount,
        password: &str,
    ) -> Result<user::Model, IdentityError> {
        let duplicates = UserRepository::find_duplicates(
            db,
            &account.normalized_user_name,
            &account.normalized_email,
        )
        .await?;

        if let Some(existing) = duplicates.first() {
            return Err(if existing.normalized_email == account.normalized_email {
                IdentityError::DuplicateEmail(account.email.clone())
            } else {
                IdentityError::DuplicateUserName(account.user_name.clone())
            });
        }

        let password_hash =
            Self::hash_password(password).map_err(|e| IdentityError::Hash(e.to_string()))?;

        Ok(UserRepository::create(db, account, password_hash).await?)
    }

    // Only durable roles can be linked.
    async fn link_role<C: ConnectionTrait>(
        db: &C,
        account: &user::Model,
        role_name: &str,
    ) -> Result<(), IdentityError> {
        let role = RoleRepository::find_by_name(db, role_name)
            .await?
            .ok_or_else(|| IdentityError::RoleNotFound(role_name.to_string()))?;

        UserRepository::link_role(db, account.id, role.id).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityManager for IdentityService {
    async fn role_exists(&self, name: &str) -> Result<bool, IdentityError> {
        if self.store.is_role_staged(name).await {
            return Ok(true);
        }
        let found = RoleRepository::find_by_name(self.store.connection(), name).await?;
        Ok(found.is_some())
    }

    async fn create_role(&self, name: &str) -> Result<(), IdentityError> {
        if name.trim().is_empty() {
            return Err(IdentityError::InvalidRoleName(name.to_string()));
        }
        if self.role_exists(name).await? {
            return Err(IdentityError::DuplicateRoleName(name.to_string()));
        }

        let description = RoleName::from_name(name).map(|r| r.description().to_string());
        self.store
            .add_roles(vec![NewRole {
                name: name.to_string(),
                description,
            }])
            .await?;
        Ok(())
    }

    async fn create_account(
        &self,
        account: &mut NewAccount,
        password: &str,
    ) -> Result<user::Model, IdentityError> {
        self.prepare_account(account, password)?;
        Self::insert_account(self.store.connection(), account, password).await
    }

    async fn assign_role(
        &self,
        account: &user::Model,
        role_name: &str,
    ) -> Result<(), IdentityError> {
        Self::link_role(self.store.connection(), account, role_name).await
    }

    async fn create_account_with_role(
        &self,
        account: &mut NewAccount,
        password: &str,
        role_name: &str,
    ) -> Result<user::Model, AccountSetupError> {
        self.prepare_account(account, password).map_err(AccountSetupError::Account)?;

        let txn = self
            .store
            .connection()
            .begin()
            .await
            .map_err(|e| AccountSetupError::Account(e.into()))?;

        let user = match Self::insert_account(&txn, account, password).await {
            Ok(user) => user,
            Err(e) => {
                rollback(txn).await;
                return Err(AccountSetupError::Account(e));
            }
        };

        if let Err(e) = Self::link_role(&txn, &user, role_name).await {
            rollback(txn).await;
            return Err(AccountSetupError::RoleAssignment(e));
        }

        txn.commit()
            .await
            .map_err(|e| AccountSetupError::RoleAssignment(e.into()))?;
        Ok(user)
    }

    fn set_user_name(&self, account: &mut NewAccount, user_name: &str) {
        account.user_name = user_name.to_string();
        account.normalized_user_name = normalize(user_name);
    }
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        tracing::error!("Failed to roll back account transaction: {}", e);
    }
}
