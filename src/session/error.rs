// Audio session error definitions
//
// Errors raised by the marshalling layer and the driver seam. The native
// accessor never returns these across the C boundary: it logs them and
// reports a boolean / absent result instead.

/// Errors that can occur during audio session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The OS reported an identifier the closed enum set has no variant for
    #[error("Unmapped {kind} identifier: {identifier}")]
    UnmappedIdentifier {
        kind: &'static str,
        identifier: String,
    },

    #[error("Unknown {kind} name: {name}")]
    UnknownName { kind: &'static str, name: String },

    #[error("Identifier table inconsistent: {0}")]
    IdentifierTable(String),

    /// The OS refused a category/mode/activation change
    #[error("Audio session rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
