/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: HS256 access/refresh token generation and validation
/// - [`middleware`]: per-request [`middleware::AuthContext`] and Bearer
///   extraction for the API server
/// - [`policy`]: membership- and creatorship-based allow/deny decisions
///
/// The split mirrors the boundary in the domain design: `password`/`jwt`/
/// `middleware` establish *who* is acting, `policy` decides *what* they may
/// do to a given board or task.

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
