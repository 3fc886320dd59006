//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural violations in the lineage data.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("expected exactly one root record, found {}: [{}]", roots.len(), roots.join(", "))]
    Structure { roots: Vec<String> },

    #[error("record '{name}' references unknown parent '{parent}'")]
    DanglingReference { name: String, parent: String },

    #[error("duplicate record name: {0}")]
    DuplicateName(String),

    #[error("cycle detected in hierarchy: {0} is not reachable from the root")]
    Cycle(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid layout bounds: min {min} max {max}")]
    InvalidBounds { min: f64, max: f64 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
