/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration, login, token refresh
/// - `users`: profile and account lifecycle
/// - `boards`: board CRUD, membership, ownership transfer
/// - `tasks`: task CRUD, status changes, drag-and-drop moves

pub mod auth;
pub mod boards;
pub mod health;
pub mod tasks;
pub mod users;
