//! Request context for operation-scoped log correlation.

use uuid::Uuid;

/// Per-operation context carried through the service layer.
///
/// Holds the request identifier used to correlate log lines for one caller
/// operation; the core keeps no other per-request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Create a context with a caller-supplied request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Create a context with a generated request id.
    pub fn with_generated_id() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }
}
