//! Sync adapter
//!
//! Orchestrates both directions of the bridge. Inbound (hub → external):
//! validate, map through the tenant's config, hand to the external store,
//! return the accepted ticket synchronously. Outbound (external → hub):
//! validate, map in the hub direction, push through the hub gateway. The
//! outbound path is driven by the external store's propagation tasks via the
//! [`OutboundSync`] callback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{BridgeError, Result};
use crate::external::ExternalStore;
use crate::mapping::{mapper, ConfigStore};
use crate::services::{HubGateway, OutboundSync, SyncSource, TenantGate};
use crate::ticket::{TenantId, Ticket};
use crate::validate::validate;

/// The bridge between the hub and the external ticket system
pub struct SyncAdapter {
    /// Identifier this adapter instance registers with on the hub side
    adapter_id: Uuid,

    /// Per-tenant mapping config cache
    config_store: Arc<ConfigStore>,

    /// The external system's ticket store
    store: Arc<ExternalStore>,

    /// Push interface into the hub
    hub: Arc<dyn HubGateway>,

    /// Optional tenant gate plus the sync type this instance serves
    gate: Option<(Arc<dyn TenantGate>, String)>,
}

impl SyncAdapter {
    /// Create an adapter over its three collaborators
    pub fn new(
        config_store: Arc<ConfigStore>,
        store: Arc<ExternalStore>,
        hub: Arc<dyn HubGateway>,
    ) -> Self {
        Self {
            adapter_id: Uuid::new_v4(),
            config_store,
            store,
            hub,
            gate: None,
        }
    }

    /// Install a tenant gate; inbound tickets whose tenant is configured for
    /// a different sync type are rejected before mapping
    pub fn with_tenant_gate(mut self, gate: Arc<dyn TenantGate>, sync_type: impl Into<String>) -> Self {
        self.gate = Some((gate, sync_type.into()));
        self
    }

    /// This instance's registration id
    pub fn adapter_id(&self) -> Uuid {
        self.adapter_id
    }

    /// Register the adapter with its collaborators
    ///
    /// Subscribes once for ticket updates from the hub, wires config-update
    /// pushes into the cache, and connects this adapter as the external
    /// store's outbound sink. Call once at startup.
    pub fn start(self: &Arc<Self>) {
        info!(adapter_id = %self.adapter_id, "Starting sync adapter");
        self.hub.subscribe_updates(self.adapter_id);
        self.config_store.subscribe_updates();
        self.store.connect(Arc::clone(self) as Arc<dyn OutboundSync>);
    }

    /// Sync a ticket mutation from the hub into the external system
    ///
    /// Returns the accepted ticket carrying both identifiers. This is the
    /// synchronous half of the contract; the eventual backward sync runs on
    /// the accepted ticket's propagation task.
    pub async fn sync_inbound(&self, ticket: Ticket) -> Result<Ticket> {
        debug!(hub_id = %ticket.hub_id, tenant = %ticket.tenant_id, "Inbound sync");

        validate(&ticket)?;
        self.check_gate(&ticket.tenant_id).await?;

        let tenant = ticket.tenant_id.clone();
        let config = self.config_store.get(&tenant).await?;

        let mut mapped = ticket;
        mapper::apply_outbound(&mut mapped, &config)?;

        let accepted = self.store.accept(mapped)?;
        info!(
            hub_id = %accepted.hub_id,
            external_id = accepted.external_id.as_deref().unwrap_or(""),
            "Inbound sync complete"
        );
        Ok(accepted)
    }

    /// Sync an externally-mutated ticket back to the hub
    ///
    /// Invoked by the ticket's propagation task. The external ticket may not
    /// carry a tenant id of its own, so the owning tenant is set explicitly
    /// before the push.
    pub async fn sync_outbound(&self, mut ticket: Ticket, tenant: &TenantId) -> Result<()> {
        debug!(
            external_id = ticket.external_id.as_deref().unwrap_or(""),
            tenant = %tenant,
            "Outbound sync"
        );

        validate(&ticket)?;

        let config = self.config_store.get(tenant).await?;
        mapper::apply_inbound(&mut ticket, &config);
        ticket.tenant_id = tenant.clone();

        self.hub.push_update(ticket).await
    }

    async fn check_gate(&self, tenant: &TenantId) -> Result<()> {
        let Some((gate, expected)) = &self.gate else {
            return Ok(());
        };
        let actual = gate.sync_type(tenant, SyncSource::Hub).await?;
        if actual != *expected {
            warn!(tenant = %tenant, expected = %expected, actual = %actual, "Tenant rejected by sync-type gate");
            return Err(BridgeError::Validation(format!(
                "Tenant {} is configured for sync type {}, not {}",
                tenant, actual, expected
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OutboundSync for SyncAdapter {
    async fn sync_outbound(&self, ticket: Ticket, tenant: &TenantId) -> Result<()> {
        SyncAdapter::sync_outbound(self, ticket, tenant).await
    }
}
