use async_trait::async_trait;

use crate::error::Result;
use crate::mapping::MappingConfig;
use crate::ticket::TenantId;

/// Callback fired when a tenant's mapping config changes upstream
pub type ConfigUpdateHandler = Box<dyn Fn(TenantId, MappingConfig) + Send + Sync>;

/// Source of per-tenant mapping configuration
#[async_trait]
pub trait ConfigService: Send + Sync {
    /// Fetch the mapping config for a tenant
    async fn retrieve_config(&self, tenant: &TenantId) -> Result<MappingConfig>;

    /// Register a handler invoked whenever any tenant's config is replaced
    /// upstream; fires with the full new config
    fn subscribe_config_updates(&self, handler: ConfigUpdateHandler);
}
