//! Storage-specific error types.
//!
//! Store failures are separated from protocol errors and classified only by
//! whether retrying later could help. The core never retries; classification
//! is for the transport layer and for callers with their own retry policy.

/// Errors surfaced by an [`EntityStore`](super::EntityStore) implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// The store is temporarily unreachable or overloaded; retrying later
    /// may succeed
    #[error("store temporarily unavailable: {message}")]
    Transient { message: String },

    /// The store rejected the operation; retrying the same request will fail
    /// the same way
    #[error("store rejected the operation: {message}")]
    Permanent { message: String },
}

impl StorageError {
    /// Create a transient (retryable) storage error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    /// Create a permanent (non-retryable) storage error.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent {
            message: message.into(),
        }
    }

    /// Whether retrying the operation later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
