use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::ticket::{TenantId, Ticket};

/// Which side of the bridge originated a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    /// The hub pushed a ticket mutation into the bridge
    Hub,
    /// The external system's view changed
    External,
}

/// Push interface into the hub
///
/// `push_update` is only called with tickets that already passed validation
/// and inbound-direction mapping.
#[async_trait]
pub trait HubGateway: Send + Sync {
    /// Push a mapped ticket update to the hub
    async fn push_update(&self, ticket: Ticket) -> Result<()>;

    /// Register this adapter instance for ticket updates from the hub;
    /// called once at startup
    fn subscribe_updates(&self, adapter_id: Uuid);
}

/// Optional per-tenant gate on which adapter instance may sync a ticket
#[async_trait]
pub trait TenantGate: Send + Sync {
    /// The sync type this tenant is configured for, given the originating side
    async fn sync_type(&self, tenant: &TenantId, source: SyncSource) -> Result<String>;
}
