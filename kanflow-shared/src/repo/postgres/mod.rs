/// Postgres repository implementations
///
/// sqlx-backed implementations of the ports in [`crate::repo`]. Queries
/// return entities through `query_as` + `RETURNING`; absence is modeled with
/// `fetch_optional`, deletion success with `rows_affected() > 0`.
///
/// Unique-constraint violations are translated into
/// [`DomainError::Conflict`](crate::error::DomainError) here so the service
/// layer sees the same taxonomy regardless of the backing store.
///
/// # Example
///
/// ```no_run
/// use kanflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use kanflow_shared::repo::postgres::PgBoardRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let boards = PgBoardRepository::new(pool);
/// # Ok(())
/// # }
/// ```

use crate::error::DomainError;

mod boards;
mod tasks;
mod users;

pub use boards::PgBoardRepository;
pub use tasks::PgTaskRepository;
pub use users::PgUserRepository;

/// Maps a sqlx write error, turning unique violations into `Conflict`
///
/// Constraint names come from the migrations; anything unrecognized stays a
/// storage error.
fn map_write_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            if constraint.contains("username") {
                return DomainError::conflict("username already taken");
            }
            if constraint.contains("email") {
                return DomainError::conflict("email already registered");
            }
            if constraint.contains("owner_name") {
                return DomainError::conflict(
                    "a board with this name already exists for this owner",
                );
            }
            return DomainError::conflict(format!("constraint violation: {}", constraint));
        }
    }
    DomainError::Storage(err)
}
