//! Error types for the fact database and query engine.

use thiserror::Error;

/// Errors raised by sentence parsing, database mutation and query evaluation.
///
/// Logical query failure is not an error; it yields a failed `QueryResult`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RePraxisError {
    #[error("Could not find closing ']' for value in: '{sentence}'")]
    UnterminatedLiteral { sentence: String },

    #[error("Node type error: {message}")]
    NodeType { message: String },

    #[error("Cardinality mismatch on '{symbol}' in sentence: '{sentence}'")]
    Cardinality { symbol: String, sentence: String },

    #[error("Child '{symbol}' not found")]
    MissingChild { symbol: String },

    #[error("Cannot add child '{symbol}': {reason}")]
    InvalidChild { symbol: String, reason: String },

    #[error("Too many parts in operand '{operand}'")]
    TooManyParts { operand: String },

    #[error("Unrecognized query clause: '{expression}'")]
    UnrecognizedClause { expression: String },

    #[error("Unknown comparator '{operator}' in clause: '{expression}'")]
    UnknownComparator { operator: String, expression: String },
}

/// Result alias for RePraxis operations.
pub type Result<T> = std::result::Result<T, RePraxisError>;
