/// Database migration runner
///
/// Applies the SQL migrations embedded from this crate's `migrations/`
/// directory using sqlx's migration system. Each migration has an up file
/// (`{timestamp}_{name}.up.sql`) and a rollback (`.down.sql`).
///
/// # Example
///
/// ```no_run
/// use kanflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use kanflow_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Migrations run inside transactions where possible; a failing migration is
/// rolled back and returned as an error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
