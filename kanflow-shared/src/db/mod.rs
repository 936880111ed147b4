/// Database plumbing
///
/// - [`pool`]: PostgreSQL connection pool construction and health checks
/// - [`migrations`]: sqlx migration runner for this crate's `migrations/`

pub mod migrations;
pub mod pool;
