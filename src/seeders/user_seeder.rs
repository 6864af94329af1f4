use crate::entities::role::RoleName;
use crate::models::account_model::NewAccount;
use crate::seeders::outcome::{AccountOutcome, SeedError};
use crate::services::identity_service::{AccountSetupError, IdentityManager};

pub const ADMIN_EMAIL: &str = "admin@yopmail.com";
pub const ADMIN_PASSWORD: &str = "Password1$";

pub fn admin_account() -> NewAccount {
    NewAccount {
        email: ADMIN_EMAIL.to_string(),
        name: "Admin Admin".to_string(),
        phone_number: Some("08131098765".to_string()),
        street_address: Some("Address def".to_string()),
        city: Some("City".to_string()),
        state: Some("State".to_string()),
        postal_code: Some("PostalCode".to_string()),
        ..Default::default()
    }
}

/// Creates the administrative account and gives it the `Admin` role.
///
/// Must run after the roles are committed. The account row and its role link
/// are written together, so a failed link leaves no account behind. Duplicate
/// and invalid accounts come back as an [`AccountOutcome`] and no role
/// assignment is attempted for them.
pub async fn seed_admin_user<I>(identity: &I) -> Result<AccountOutcome, SeedError>
where
    I: IdentityManager + ?Sized,
{
    let mut account = admin_account();
    identity.set_user_name(&mut account, ADMIN_EMAIL);
    account.email_confirmed = true;

    let role = RoleName::Admin;
    let result = identity
        .create_account_with_role(&mut account, ADMIN_PASSWORD, role.as_str())
        .await;

    let user = match result {
        Ok(user) => user,
        Err(AccountSetupError::Account(e)) if e.is_duplicate() => {
            tracing::warn!(email = ADMIN_EMAIL, error = %e, "Admin account not created");
            return Ok(AccountOutcome::AlreadyExists);
        }
        Err(AccountSetupError::Account(e)) => {
            if let Some(messages) = e.validation_messages() {
                tracing::warn!(email = ADMIN_EMAIL, error = %e, "Admin account rejected");
                return Ok(AccountOutcome::ValidationFailed(messages));
            }
            return Err(SeedError::AccountCreationFailed {
                email: ADMIN_EMAIL.to_string(),
                reason: e.to_string(),
            });
        }
        Err(AccountSetupError::RoleAssignment(source)) => {
            return Err(SeedError::RoleAssignmentFailed {
                role: role.to_string(),
                email: ADMIN_EMAIL.to_string(),
                source,
            });
        }
    };

    tracing::info!(
        email = %user.email,
        public_id = %user.public_id,
        role = %role,
        "Admin account created"
    );
    tracing::warn!(
        email = %user.email,
        "Admin account uses the default seed password, change it before going live"
    );

    Ok(AccountOutcome::Created {
        public_id: user.public_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeders::outcome::SeedStep;
    use crate::seeders::testing::MemoryBackend;

    #[tokio::test]
    async fn creates_confirmed_admin_and_assigns_role() {
        let backend = MemoryBackend::with_roles(&["Customer", "Employee", "Admin", "Company"]);

        let outcome = seed_admin_user(&backend).await.unwrap();

        let state = backend.state();
        assert_eq!(state.users.len(), 1);
        let user = &state.users[0];
        assert!(matches!(
            outcome,
            AccountOutcome::Created { public_id } if public_id == user.public_id
        ));
        assert_eq!(user.email, ADMIN_EMAIL);
        assert_eq!(user.user_name, ADMIN_EMAIL);
        assert_eq!(user.normalized_email, "ADMIN@YOPMAIL.COM");
        assert!(user.email_confirmed);
        assert_eq!(user.phone_number.as_deref(), Some("08131098765"));
        assert_eq!(state.assignments, vec![(user.id, "Admin".to_string())]);
    }

    #[tokio::test]
    async fn duplicate_account_skips_role_assignment() {
        let backend = MemoryBackend::with_roles(&["Admin"]);
        seed_admin_user(&backend).await.unwrap();
        backend.state().calls.clear();

        let outcome = seed_admin_user(&backend).await.unwrap();

        assert_eq!(outcome, AccountOutcome::AlreadyExists);
        let state = backend.state();
        assert_eq!(state.users.len(), 1);
        assert!(!state.calls.iter().any(|c| c.starts_with("assign_role")));
    }

    #[tokio::test]
    async fn rejected_password_is_a_validation_outcome() {
        let backend = MemoryBackend::with_roles(&["Admin"]);
        backend.state().reject_passwords = true;

        let outcome = seed_admin_user(&backend).await.unwrap();

        assert!(matches!(outcome, AccountOutcome::ValidationFailed(ref m) if !m.is_empty()));
        assert!(backend.state().assignments.is_empty());
    }

    #[tokio::test]
    async fn missing_admin_role_leaves_no_account_behind() {
        let backend = MemoryBackend::with_roles(&["Customer"]);

        let err = seed_admin_user(&backend).await.unwrap_err();

        assert_eq!(err.step(), SeedStep::RoleAssignment);
        let state = backend.state();
        assert!(state.users.is_empty());
        assert!(state.assignments.is_empty());
        assert_eq!(state.writes, 0);
    }
}
