use async_trait::async_trait;

use crate::error::Result;
use crate::ticket::{TenantId, Ticket};

/// Callback from the external store into the bridge
///
/// Implemented by the sync adapter; invoked by a ticket's propagation task
/// after every external mutation. The external ticket may not carry a tenant
/// id of its own, so the owning tenant is passed alongside.
#[async_trait]
pub trait OutboundSync: Send + Sync {
    /// Sync one externally-mutated ticket back to the hub
    async fn sync_outbound(&self, ticket: Ticket, tenant: &TenantId) -> Result<()>;
}
