use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::repositories::seed_store::{CommitSummary, StoreError};
use crate::services::identity_service::IdentityError;

/// Seeding steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    Guard,
    Roles,
    Categories,
    Commit,
    Account,
    RoleAssignment,
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedStep::Guard => "guard",
            SeedStep::Roles => "roles",
            SeedStep::Categories => "categories",
            SeedStep::Commit => "commit",
            SeedStep::Account => "account",
            SeedStep::RoleAssignment => "role_assignment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to check whether the store is already seeded: {0}")]
    GuardQueryFailed(#[source] StoreError),

    #[error("failed to create role '{role}': {source}")]
    RoleCreationFailed { role: String, source: IdentityError },

    #[error("failed to stage categories: {0}")]
    CategoryInsertFailed(#[source] StoreError),

    #[error("failed to commit roles and categories: {0}")]
    StoreCommitFailed(#[source] StoreError),

    #[error("admin account '{email}' was not created: {reason}")]
    AccountCreationFailed { email: String, reason: String },

    #[error("failed to assign role '{role}' to '{email}': {source}")]
    RoleAssignmentFailed {
        role: String,
        email: String,
        source: IdentityError,
    },
}

impl SeedError {
    pub fn step(&self) -> SeedStep {
        match self {
            SeedError::GuardQueryFailed(_) => SeedStep::Guard,
            SeedError::RoleCreationFailed { .. } => SeedStep::Roles,
            SeedError::CategoryInsertFailed(_) => SeedStep::Categories,
            SeedError::StoreCommitFailed(_) => SeedStep::Commit,
            SeedError::AccountCreationFailed { .. } => SeedStep::Account,
            SeedError::RoleAssignmentFailed { .. } => SeedStep::RoleAssignment,
        }
    }
}

/// What the account provisioner did with the administrative account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountOutcome {
    Created { public_id: Uuid },
    AlreadyExists,
    ValidationFailed(Vec<String>),
}

impl fmt::Display for AccountOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountOutcome::Created { public_id } => write!(f, "created ({public_id})"),
            AccountOutcome::AlreadyExists => {
                f.write_str("an account with the same identity already exists")
            }
            AccountOutcome::ValidationFailed(messages) => {
                write!(f, "validation failed: {}", messages.join("; "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub committed: CommitSummary,
    /// `None` when the account step failed with an error instead of an outcome.
    pub account: Option<AccountOutcome>,
}

#[derive(Debug)]
pub enum SeedOutcome {
    /// Roles were already present; nothing was written.
    AlreadySeeded,
    Seeded(SeedReport),
    /// Roles and categories are durable but the account step did not finish.
    Partial { report: SeedReport, error: SeedError },
    /// Nothing was committed.
    Failed(SeedError),
}

impl SeedOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SeedOutcome::AlreadySeeded | SeedOutcome::Seeded(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SeedOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&SeedError> {
        match self {
            SeedOutcome::Partial { error, .. } | SeedOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn failed_step(&self) -> Option<SeedStep> {
        self.error().map(SeedError::step)
    }

    pub fn report(&self) -> Option<&SeedReport> {
        match self {
            SeedOutcome::Seeded(report) | SeedOutcome::Partial { report, .. } => Some(report),
            _ => None,
        }
    }
}
