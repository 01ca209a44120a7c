//! Error types for the ontology merge engine.

use thiserror::Error;

use crate::expr::Combinator;
use crate::merge::MergeReport;

/// Main error type for ontoforge operations.
#[derive(Error, Debug)]
pub enum OntoforgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Disjointness error: {0}")]
    Disjointness(#[from] DisjointnessError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Instance error: {0}")]
    Instance(#[from] InstanceError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors building or evaluating a domain/range expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("Invalid arity for {combinator} expression: {count} entities")]
    InvalidArity { combinator: Combinator, count: usize },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

/// Errors applying a hierarchy edge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Hierarchy edge {subclass} -> {superclass} would create a cycle")]
    Cycle { subclass: String, superclass: String },
}

/// Errors applying a disjointness assertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisjointnessError {
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Class cannot be disjoint with itself: {0}")]
    SelfDisjoint(String),
}

/// Errors applying a data-property value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Owner key has no classes")]
    EmptyOwnerKey,
}

/// Errors applying an object-property instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Invalid arity for {combinator} expression: {count} entities")]
    InvalidArity { combinator: Combinator, count: usize },

    #[error("Instance is missing its {0} expression")]
    MissingExpression(&'static str),
}

impl From<ExpressionError> for InstanceError {
    fn from(err: ExpressionError) -> Self {
        match err {
            ExpressionError::InvalidArity { combinator, count } => {
                InstanceError::InvalidArity { combinator, count }
            }
            ExpressionError::UnknownEntity(name) => InstanceError::UnknownClass(name),
        }
    }
}

/// Errors reading or writing a durable snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Terminal errors for a merge call.
#[derive(Error, Debug)]
pub enum MergeError {
    /// The snapshot write failed after one or more phases were applied.
    ///
    /// Earlier phases are not rolled back; the accumulated report is
    /// carried so callers can see what was applied before the failure.
    #[error("Snapshot write failed: {source}")]
    PersistenceFailed {
        report: Box<MergeReport>,
        #[source]
        source: SnapshotError,
    },
}

/// Result type alias for ontoforge operations.
pub type Result<T> = std::result::Result<T, OntoforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OntoforgeError::Hierarchy(HierarchyError::Cycle {
            subclass: "acid".to_string(),
            superclass: "base".to_string(),
        });
        assert!(err.to_string().contains("acid"));
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_instance_error_from_expression_error() {
        let err: InstanceError = ExpressionError::UnknownEntity("benzene".to_string()).into();
        assert_eq!(err, InstanceError::UnknownClass("benzene".to_string()));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OntoforgeError = io_err.into();
        assert!(matches!(err, OntoforgeError::Io(_)));
    }
}
