//! Per-tenant config cache
//!
//! Configs are fetched lazily from the [`ConfigService`] collaborator on
//! first reference and cached indefinitely. The only invalidation path is a
//! push-based replacement when the collaborator signals that a tenant's
//! config changed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use tracing::{debug, warn};

use crate::error::{BridgeError, Result};
use crate::mapping::MappingConfig;
use crate::services::ConfigService;
use crate::ticket::TenantId;

/// Shared cache of per-tenant mapping configs
///
/// Read by every in-flight sync concurrently; the lock is never held across
/// an await. Two concurrent misses for the same tenant may both hit the
/// collaborator; the later insert replaces the earlier `Arc` atomically, so
/// readers always see a complete config.
pub struct ConfigStore {
    service: Arc<dyn ConfigService>,
    cache: RwLock<HashMap<TenantId, Arc<MappingConfig>>>,
}

impl ConfigStore {
    /// Create a store backed by a config collaborator
    pub fn new(service: Arc<dyn ConfigService>) -> Self {
        Self {
            service,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the mapping config for a tenant, fetching and caching on miss
    ///
    /// A failed fetch caches nothing; the next call retries.
    pub async fn get(&self, tenant: &TenantId) -> Result<Arc<MappingConfig>> {
        if let Some(config) = self.cache.read().unwrap().get(tenant).cloned() {
            return Ok(config);
        }

        let config = self
            .service
            .retrieve_config(tenant)
            .await
            .map_err(|e| {
                warn!(tenant = %tenant, error = %e, "Config retrieval failed");
                BridgeError::ConfigUnavailable {
                    tenant: tenant.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let config = Arc::new(config);
        self.cache
            .write()
            .unwrap()
            .insert(tenant.clone(), config.clone());
        debug!(tenant = %tenant, "Cached mapping config");

        Ok(config)
    }

    /// Overwrite a tenant's cached config
    ///
    /// Readers holding the previous `Arc` finish their sync against the old
    /// tables; new lookups see the replacement.
    pub fn replace(&self, tenant: TenantId, config: MappingConfig) {
        debug!(tenant = %tenant, "Replacing cached mapping config");
        self.cache
            .write()
            .unwrap()
            .insert(tenant, Arc::new(config));
    }

    /// Wire the collaborator's push channel to `replace`
    ///
    /// Holds only a weak reference, so dropping the store unregisters it in
    /// effect: updates after teardown are discarded.
    pub fn subscribe_updates(self: &Arc<Self>) {
        let store: Weak<Self> = Arc::downgrade(self);
        self.service
            .subscribe_config_updates(Box::new(move |tenant, config| {
                if let Some(store) = store.upgrade() {
                    store.replace(tenant, config);
                }
            }));
    }

    /// Whether a tenant's config is currently cached
    pub fn contains(&self, tenant: &TenantId) -> bool {
        self.cache.read().unwrap().contains_key(tenant)
    }
}
