use crate::entities::role::RoleName;
use crate::seeders::outcome::SeedError;
use crate::services::identity_service::IdentityManager;

/// The only role checked before creating the set.
pub const SENTINEL_ROLE: RoleName = RoleName::Customer;

/// Stages every canonical role unless the sentinel role already exists.
///
/// Only the sentinel is checked: if it exists and another role is missing,
/// the missing role is not recreated. A failing creation stops the remaining
/// ones; roles staged before it stay staged until the caller discards them.
pub async fn seed_roles<I>(identity: &I) -> Result<usize, SeedError>
where
    I: IdentityManager + ?Sized,
{
    let exists = identity
        .role_exists(SENTINEL_ROLE.as_str())
        .await
        .map_err(|source| SeedError::RoleCreationFailed {
            role: SENTINEL_ROLE.to_string(),
            source,
        })?;

    if exists {
        tracing::debug!(sentinel = %SENTINEL_ROLE, "Sentinel role present, skipping roles");
        return Ok(0);
    }

    for role in RoleName::ALL {
        identity
            .create_role(role.as_str())
            .await
            .map_err(|source| SeedError::RoleCreationFailed {
                role: role.to_string(),
                source,
            })?;
        tracing::debug!(role = %role, "Staged role");
    }

    Ok(RoleName::ALL.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeders::outcome::SeedStep;
    use crate::seeders::testing::MemoryBackend;

    #[tokio::test]
    async fn stages_all_roles_in_order() {
        let backend = MemoryBackend::default();

        let staged = seed_roles(&backend).await.unwrap();

        assert_eq!(staged, 4);
        assert_eq!(
            backend.state().staged_roles,
            vec!["Customer", "Employee", "Admin", "Company"]
        );
    }

    #[tokio::test]
    async fn sentinel_short_circuits_even_when_admin_is_missing() {
        let backend = MemoryBackend::with_roles(&["Customer"]);

        let staged = seed_roles(&backend).await.unwrap();

        assert_eq!(staged, 0);
        assert!(backend.state().staged_roles.is_empty());
    }

    #[tokio::test]
    async fn failing_role_stops_the_rest() {
        let backend = MemoryBackend::default();
        backend.state().fail_create_role = Some("Admin".to_string());

        let err = seed_roles(&backend).await.unwrap_err();

        assert_eq!(err.step(), SeedStep::Roles);
        assert!(matches!(err, SeedError::RoleCreationFailed { ref role, .. } if role == "Admin"));
        assert_eq!(backend.state().staged_roles, vec!["Customer", "Employee"]);
    }
}
