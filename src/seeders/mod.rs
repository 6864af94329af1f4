pub mod category_seeder;
pub mod outcome;
pub mod role_seeder;
pub mod user_seeder;

#[cfg(test)]
pub(crate) mod testing;

use sea_orm::DatabaseConnection;

use crate::repositories::seed_store::{CommitSummary, EntityStore, SeaOrmStore};
use crate::services::identity_service::{IdentityManager, IdentityService};
use outcome::{AccountOutcome, SeedError, SeedOutcome, SeedReport};

/// Seeds a SeaORM database: roles, categories, then the admin account.
pub async fn run_seeders(db: &DatabaseConnection) -> SeedOutcome {
    let store = SeaOrmStore::new(db.clone());
    let identity = IdentityService::new(store.clone());
    seed_data(&store, &identity).await
}

/// Brings an empty store to its initial state.
///
/// The store counts as seeded as soon as any role exists; in that case nothing
/// is written. The check is not atomic with the writes that follow, so two
/// processes starting together can both seed.
///
/// Every step is awaited before this returns. Failures never propagate: they
/// are logged and reported through the returned [`SeedOutcome`].
pub async fn seed_data<S, I>(store: &S, identity: &I) -> SeedOutcome
where
    S: EntityStore + ?Sized,
    I: IdentityManager + ?Sized,
{
    tracing::info!("About to start data seeding");

    match store.query_roles().await {
        Ok(roles) if !roles.is_empty() => {
            tracing::info!(roles = roles.len(), "Data has already been seeded, skipping");
            return SeedOutcome::AlreadySeeded;
        }
        Ok(_) => {}
        Err(e) => return finish(SeedOutcome::Failed(SeedError::GuardQueryFailed(e))),
    }

    let committed = match stage_and_commit(store, identity).await {
        Ok(summary) => summary,
        Err(error) => {
            store.discard().await;
            return finish(SeedOutcome::Failed(error));
        }
    };

    let outcome = match user_seeder::seed_admin_user(identity).await {
        Ok(account @ AccountOutcome::Created { .. }) => SeedOutcome::Seeded(SeedReport {
            committed,
            account: Some(account),
        }),
        Ok(account) => SeedOutcome::Partial {
            error: SeedError::AccountCreationFailed {
                email: user_seeder::ADMIN_EMAIL.to_string(),
                reason: account.to_string(),
            },
            report: SeedReport {
                committed,
                account: Some(account),
            },
        },
        Err(error) => SeedOutcome::Partial {
            report: SeedReport {
                committed,
                account: None,
            },
            error,
        },
    };

    finish(outcome)
}

// Roles and categories share one flush; the account step depends on it being durable.
async fn stage_and_commit<S, I>(store: &S, identity: &I) -> Result<CommitSummary, SeedError>
where
    S: EntityStore + ?Sized,
    I: IdentityManager + ?Sized,
{
    role_seeder::seed_roles(identity).await?;
    category_seeder::seed_categories(store).await?;

    let summary = store.commit().await.map_err(SeedError::StoreCommitFailed)?;
    tracing::info!(
        roles = summary.roles,
        categories = summary.categories,
        "Committed roles and categories"
    );
    Ok(summary)
}

fn finish(outcome: SeedOutcome) -> SeedOutcome {
    match &outcome {
        SeedOutcome::AlreadySeeded => {}
        SeedOutcome::Seeded(report) => {
            tracing::info!(
                roles = report.committed.roles,
                categories = report.committed.categories,
                "Data seeding completed successfully"
            );
        }
        SeedOutcome::Partial { report, error } => {
            tracing::warn!(
                step = %error.step(),
                error = %error,
                roles = report.committed.roles,
                categories = report.committed.categories,
                "Data seeding partially completed, admin account is not ready"
            );
        }
        SeedOutcome::Failed(error) => {
            tracing::error!(
                step = %error.step(),
                error = %error,
                "Error seeding data, store has no baseline roles or categories"
            );
        }
    }
    outcome
}
