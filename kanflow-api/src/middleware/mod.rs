/// HTTP middleware
///
/// - `security`: OWASP security headers applied to every response

pub mod security;
