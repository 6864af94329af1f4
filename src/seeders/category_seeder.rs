use crate::repositories::seed_store::{EntityStore, NewCategory};
use crate::seeders::outcome::SeedError;

/// Reference categories as `(name, display_order)`.
pub const CATEGORIES: [(&str, i32); 5] = [
    ("Law", 1),
    ("Marriage", 2),
    ("Children", 3),
    ("Education", 4),
    ("Business", 5),
];

// No existence check here: the orchestrator guard decides whether this runs.
pub async fn seed_categories<S>(store: &S) -> Result<usize, SeedError>
where
    S: EntityStore + ?Sized,
{
    let batch: Vec<NewCategory> = CATEGORIES
        .iter()
        .map(|(name, display_order)| NewCategory {
            name: name.to_string(),
            display_order: *display_order,
        })
        .collect();
    let count = batch.len();

    store
        .add_categories(batch)
        .await
        .map_err(SeedError::CategoryInsertFailed)?;

    tracing::debug!(count, "Staged categories");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeders::testing::MemoryBackend;

    #[tokio::test]
    async fn stages_fixed_categories_without_writing() {
        let backend = MemoryBackend::default();

        assert_eq!(seed_categories(&backend).await.unwrap(), 5);

        let state = backend.state();
        assert_eq!(state.writes, 0);
        assert!(state.staged_categories.contains(&("Education".to_string(), 4)));
        assert_eq!(state.staged_categories.len(), 5);
    }

    #[tokio::test]
    async fn store_rejection_is_reported_as_category_failure() {
        let backend = MemoryBackend::default();
        backend.state().fail_add_categories = true;

        let err = seed_categories(&backend).await.unwrap_err();

        assert!(matches!(err, SeedError::CategoryInsertFailed(_)));
    }
}
