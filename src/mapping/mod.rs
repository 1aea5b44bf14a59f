//! Per-tenant field mapping
//!
//! Each tenant carries four independent directional translation tables for
//! status, priority, and user identity. The tables are explicitly *not*
//! inverses of each other: hub→external and external→hub are configured
//! separately and may disagree.
//!
//! - [`MappingConfig`]: the tables for one tenant
//! - [`mapper`]: pure functions applying a config to a ticket
//! - [`ConfigStore`]: lazily-fetched, push-replaceable per-tenant cache

mod config;
pub mod mapper;
mod store;

pub use config::{MappingConfig, UserIdMapping};
pub use store::ConfigStore;
