//! In-memory collaborator implementations
//!
//! These stand in for the hub and the config backend so the bridge can be
//! exercised without any surrounding infrastructure. Development and test
//! use only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{BridgeError, Result};
use crate::mapping::{MappingConfig, UserIdMapping};
use crate::services::{ConfigService, ConfigUpdateHandler, HubGateway, SyncSource, TenantGate};
use crate::ticket::{TenantId, Ticket};
use crate::validate::validate;

/// A mapping config exercising every table
///
/// Note the deliberate asymmetries: several external statuses fold into one
/// hub status, while the outbound table fans hub statuses out to different
/// values.
pub fn sample_config() -> MappingConfig {
    MappingConfig::new()
        .with_status_to_external("Open", "In progress")
        .with_status_to_external("Close", "Closed")
        .with_status_to_external("ClosePending", "Resolved")
        .with_status_to_hub("New", "Open")
        .with_status_to_hub("In progress", "Open")
        .with_status_to_hub("On hold", "Open")
        .with_status_to_hub("Canceled", "Close")
        .with_status_to_hub("Resolved", "Close")
        .with_status_to_hub("Closed", "Close")
        .with_priority_to_external("Critical", "10")
        .with_priority_to_external("Major", "5")
        .with_priority_to_external("Minor", "3")
        .with_priority_to_external("Informational", "1")
        .with_user_to_external("john.doe@acme.com", UserIdMapping::new("jdoe", "username"))
        .with_user_to_external("peter.smith@acme.com", UserIdMapping::new("psmith", "username"))
        .with_user_to_hub("jdoe", "john.doe@acme.com")
        .with_user_to_hub("psmith", "peter.smith@acme.com")
}

/// Config collaborator serving canned per-tenant configs
pub struct StaticConfigService {
    configs: Mutex<HashMap<TenantId, MappingConfig>>,
    handlers: Mutex<Vec<ConfigUpdateHandler>>,
    retrievals: AtomicUsize,
}

impl StaticConfigService {
    /// Create an empty service; every retrieval fails until configs are added
    pub fn new() -> Self {
        Self {
            configs: Mutex::new(HashMap::new()),
            handlers: Mutex::new(Vec::new()),
            retrievals: AtomicUsize::new(0),
        }
    }

    /// Add a tenant's config
    pub fn with_config(self, tenant: impl Into<TenantId>, config: MappingConfig) -> Self {
        self.configs.lock().unwrap().insert(tenant.into(), config);
        self
    }

    /// Number of retrieve calls served so far
    pub fn retrievals(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }

    /// Replace a tenant's config and fire every subscribed handler
    pub fn push_update(&self, tenant: TenantId, config: MappingConfig) {
        self.configs
            .lock()
            .unwrap()
            .insert(tenant.clone(), config.clone());
        for handler in self.handlers.lock().unwrap().iter() {
            handler(tenant.clone(), config.clone());
        }
    }
}

impl Default for StaticConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigService for StaticConfigService {
    async fn retrieve_config(&self, tenant: &TenantId) -> Result<MappingConfig> {
        self.retrievals.fetch_add(1, Ordering::SeqCst);
        self.configs
            .lock()
            .unwrap()
            .get(tenant)
            .cloned()
            .ok_or_else(|| BridgeError::Other(format!("no config for tenant {}", tenant)))
    }

    fn subscribe_config_updates(&self, handler: ConfigUpdateHandler) {
        self.handlers.lock().unwrap().push(handler);
    }
}

/// Hub gateway that records every pushed ticket
///
/// Enforces the push contract: a structurally incomplete ticket is rejected
/// the way the real hub would reject it.
pub struct RecordingHub {
    pushed: Mutex<Vec<Ticket>>,
    subscriptions: Mutex<Vec<Uuid>>,
    failing: AtomicBool,
}

impl RecordingHub {
    /// Create a hub that accepts everything valid
    pub fn new() -> Self {
        Self {
            pushed: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent pushes fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every ticket pushed so far
    pub fn pushed(&self) -> Vec<Ticket> {
        self.pushed.lock().unwrap().clone()
    }

    /// The most recently pushed ticket
    pub fn last_pushed(&self) -> Option<Ticket> {
        self.pushed.lock().unwrap().last().cloned()
    }

    /// Adapter ids that registered for updates
    pub fn subscriptions(&self) -> Vec<Uuid> {
        self.subscriptions.lock().unwrap().clone()
    }
}

impl Default for RecordingHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HubGateway for RecordingHub {
    async fn push_update(&self, ticket: Ticket) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BridgeError::Transport("hub push rejected".to_string()));
        }
        validate(&ticket)?;
        self.pushed.lock().unwrap().push(ticket);
        Ok(())
    }

    fn subscribe_updates(&self, adapter_id: Uuid) {
        self.subscriptions.lock().unwrap().push(adapter_id);
    }
}

/// Tenant gate serving canned sync types
pub struct StaticTenantGate {
    sync_types: Mutex<HashMap<TenantId, String>>,
}

impl StaticTenantGate {
    /// Create an empty gate; unknown tenants fail the lookup
    pub fn new() -> Self {
        Self {
            sync_types: Mutex::new(HashMap::new()),
        }
    }

    /// Set a tenant's sync type
    pub fn with_sync_type(self, tenant: impl Into<TenantId>, sync_type: impl Into<String>) -> Self {
        self.sync_types
            .lock()
            .unwrap()
            .insert(tenant.into(), sync_type.into());
        self
    }
}

impl Default for StaticTenantGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantGate for StaticTenantGate {
    async fn sync_type(&self, tenant: &TenantId, _source: SyncSource) -> Result<String> {
        self.sync_types
            .lock()
            .unwrap()
            .get(tenant)
            .cloned()
            .ok_or_else(|| BridgeError::Other(format!("no sync type for tenant {}", tenant)))
    }
}
