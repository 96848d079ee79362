//! Error types for port operations.

/// Store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Record not found - includes record type and ID for actionable error messages.
    #[error("{record_type} not found: {id}")]
    NotFound {
        record_type: &'static str,
        id: String,
    },

    /// Storage operation failed - includes operation name for tracing.
    #[error("storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with record type and ID context.
    pub fn not_found(record_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            record_type,
            id: id.to_string(),
        }
    }

    /// Create a Storage error with operation context.
    pub fn storage(operation: &'static str, message: impl ToString) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors from auxiliary collaborators (points, achievements, lore,
/// metrics, checkpoints).
///
/// These never fail a committed transition: callers log them and move on.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{collaborator} call failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, message: impl ToString) -> Self {
        Self {
            collaborator,
            message: message.to_string(),
        }
    }
}
