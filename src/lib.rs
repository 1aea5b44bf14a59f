//! TicketBridge - Bidirectional Ticket Synchronization Bridge
//!
//! TicketBridge keeps tickets in sync between two independent ticket-tracking
//! systems: the "hub" (the primary system where tickets are created) and an
//! external system with its own status, priority, and user vocabulary. Each
//! field crossing the boundary is translated through a per-tenant mapping
//! config, and every accepted ticket gets a long-lived propagation task that
//! pushes the external system's view back to the hub as it keeps changing.
//!
//! # Architecture
//!
//! - **ticket**: Core data structures (Ticket, Comment, Attachment, TenantId)
//! - **mapping**: Per-tenant directional field mapping and the config cache
//! - **validate**: Structural completeness checks at the protocol boundary
//! - **services**: Collaborator traits (config service, hub gateway)
//! - **external**: External ticket store and its propagation tasks
//! - **adapter**: The sync adapter orchestrating both directions

pub mod adapter;
pub mod error;
pub mod external;
pub mod logging;
pub mod mapping;
pub mod mocks;
pub mod services;
pub mod ticket;
pub mod validate;

// Re-exports
pub use error::{BridgeError, Result};
