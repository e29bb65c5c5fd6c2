//! Error types and handling for expression rendering

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for readex operations
#[derive(Debug, Error)]
pub enum ReadexError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// The integration hook was initialized more than once in this process
    #[error("Already initialized")]
    AlreadyInitialized,

    /// A node kind the renderer has no rule for
    #[error("Unsupported node '{kind}': {message}")]
    UnsupportedNode { kind: String, message: String },

    /// An operator applied to operand types it is not defined for
    #[error("Unsupported operation '{operator}' over {operands}")]
    UnsupportedOperation { operator: String, operands: String },

    /// A node whose declared type disagrees with its operator, test or method
    #[error("Type mismatch in {node}: expected {expected}, found {found}")]
    TypeMismatch {
        node: &'static str,
        expected: String,
        found: String,
    },

    /// The precedence table has no entry for an operator of the node model
    #[error("No precedence entry for operator '{operator}'")]
    PrecedenceGap { operator: String },

    /// A literal value that cannot be represented
    #[error("Invalid {kind} literal: '{text}'")]
    InvalidLiteral { kind: &'static str, text: String },

    /// Serialization of trees or snapshots
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Render,
    Internal,
    Serialization,
    Io,
}

impl ReadexError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadexError::ConfigError { .. } | ReadexError::AlreadyInitialized => ErrorKind::Config,
            ReadexError::UnsupportedNode { .. }
            | ReadexError::UnsupportedOperation { .. }
            | ReadexError::TypeMismatch { .. }
            | ReadexError::InvalidLiteral { .. } => ErrorKind::Render,
            ReadexError::PrecedenceGap { .. } | ReadexError::InternalError { .. } => {
                ErrorKind::Internal
            }
            ReadexError::SerializationError { .. } => ErrorKind::Serialization,
            ReadexError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error only affects the tree it was raised for
    ///
    /// Render failures are deterministic for the offending tree but do not
    /// poison other trees rendered in the same batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Render | ErrorKind::Serialization)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an unsupported node error
    pub fn unsupported_node(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedNode {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(operator: impl Into<String>, operands: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operator: operator.into(),
            operands: operands.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        node: &'static str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            node,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid literal error
    pub fn invalid_literal(kind: &'static str, text: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            kind,
            text: text.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for ReadexError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ReadexError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}
