//! Domain error taxonomy.
//!
//! `DomainError` is the single error type returned by every repository and
//! service operation. Each rejection names the rule or resource that failed,
//! so the transport layer can map it to an HTTP status without the domain
//! core ever knowing about HTTP.
//!
//! Variants:
//! - `NotFound { resource, id }` — a referenced entity does not exist.
//! - `Forbidden(rule)` — authorization denial; names the rule that failed.
//! - `Validation(rule)` — structural/business-rule violation.
//! - `Conflict(what)` — uniqueness violation.
//! - `Storage(..)` — ambient backend failure (maps to HTTP 500).

use uuid::Uuid;

/// Result alias used throughout the domain and service layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// The domain error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A referenced resource could not be found.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of resource that was missing (e.g. "board", "task", "user").
        resource: String,
        /// Identifier that was looked up.
        id: Uuid,
    },

    /// Authorization denial; the payload names the rule that failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Structural or business-rule violation; the payload names the rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation; the payload names what conflicted.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Ambient backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl DomainError {
    /// Construct a `NotFound` for the given resource kind and id.
    pub fn not_found(resource: impl Into<String>, id: Uuid) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Construct a `Forbidden` naming the rule that failed.
    pub fn forbidden(rule: impl Into<String>) -> Self {
        DomainError::Forbidden(rule.into())
    }

    /// Construct a `Validation` naming the rule that failed.
    pub fn validation(rule: impl Into<String>) -> Self {
        DomainError::Validation(rule.into())
    }

    /// Construct a `Conflict` naming what conflicted.
    pub fn conflict(what: impl Into<String>) -> Self {
        DomainError::Conflict(what.into())
    }

    /// Returns `true` if this is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    /// Returns `true` if this is a `Forbidden`.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DomainError::Forbidden(_))
    }

    /// Returns `true` if this is a `Validation`.
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }

    /// Returns `true` if this is a `Conflict`.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(_))
    }

    /// Returns `true` if this is a `Storage`.
    pub fn is_storage(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}
