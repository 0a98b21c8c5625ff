//! Unified error type for the domain layer
//!
//! Covers structural mistakes callers can make while building catalogs,
//! schemas, and sessions. The evaluator itself never produces errors -
//! unresolved or cyclic references evaluate to unreachable instead.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., a link between a check and itself)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A record with this name already exists in the target collection
    #[error("Duplicate {entity_type} name: {name}")]
    DuplicateName {
        entity_type: &'static str,
        name: String,
    },

    /// Entity not found by name
    #[error("{entity_type} not found: {name}")]
    NotFound {
        entity_type: &'static str,
        name: String,
    },
}

impl DomainError {
    /// Creates a validation error for constraint violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
