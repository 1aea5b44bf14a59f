//! Error types for TicketBridge
//!
//! Defines the error enum covering every failure mode at the sync boundary.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for TicketBridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error type for TicketBridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required ticket field is missing or empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// An outbound user identity has no mapping entry
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// The config collaborator failed; nothing was cached
    #[error("Config unavailable for tenant {tenant}: {reason}")]
    ConfigUnavailable { tenant: String, reason: String },

    /// Pushing to the hub or accepting into the external store failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Ticket not found in the external store
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Build a validation error naming the offending field
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("Field {} cannot be null or empty", field))
    }
}
