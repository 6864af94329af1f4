use anyhow::Context;
use bookverse_seed::config::Config;
use bookverse_seed::seeders;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookverse_seed=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cfg = Config::init()?;
    tracing::info!("Starting BookVerse seeding");

    // 1. Database Connection
    let db = Database::connect(&cfg.database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Database connected");

    // 2. Schema
    if cfg.run_migrations {
        Migrator::up(&db, None).await.context("failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    // 3. Seeding
    let outcome = seeders::run_seeders(&db).await;
    if cfg.seed_fail_fast && outcome.is_failure() {
        let step = outcome.failed_step().map(|s| s.to_string()).unwrap_or_default();
        anyhow::bail!("seeding failed at step '{step}', refusing to start without roles");
    }

    Ok(())
}
