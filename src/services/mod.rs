//! Collaborator traits
//!
//! The bridge core never talks to a concrete config backend, hub transport,
//! or wire protocol. Each collaborator is a trait implemented by the hosting
//! process; the in-memory implementations in [`crate::mocks`] cover tests and
//! development.

mod config_service;
mod hub_gateway;
mod outbound_sync;

pub use config_service::{ConfigService, ConfigUpdateHandler};
pub use hub_gateway::{HubGateway, SyncSource, TenantGate};
pub use outbound_sync::OutboundSync;
