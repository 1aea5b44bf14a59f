//! Mapping configuration for a single tenant

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User identity mapping entry for the hub→external direction
///
/// The external system may address users by different kinds of identifier
/// (username, email, numeric id); `id_kind` tags which one `external_id` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdMapping {
    /// Identifier on the external side
    pub external_id: String,

    /// Kind of identifier (e.g., "username", "email")
    pub id_kind: String,
}

impl UserIdMapping {
    /// Create a new user mapping entry
    pub fn new(external_id: impl Into<String>, id_kind: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            id_kind: id_kind.into(),
        }
    }
}

/// Directional translation tables for one tenant
///
/// The hub→external and external→hub tables are independent. Deriving one
/// from the other would change sync behavior: real deployments map several
/// external statuses onto one hub status while fanning a single hub status
/// out to a different external value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Hub status → external status
    #[serde(default)]
    pub status_to_external: HashMap<String, String>,

    /// External status → hub status
    #[serde(default)]
    pub status_to_hub: HashMap<String, String>,

    /// Hub priority → external priority
    #[serde(default)]
    pub priority_to_external: HashMap<String, String>,

    /// External priority → hub priority
    ///
    /// Configured alongside the outbound table but not consumed by any
    /// mapping operation; inbound priorities cross the boundary unchanged.
    #[serde(default)]
    pub priority_to_hub: HashMap<String, String>,

    /// Hub user id → external user identity
    #[serde(default)]
    pub user_to_external: HashMap<String, UserIdMapping>,

    /// External username → hub-facing identity
    #[serde(default)]
    pub user_to_hub: HashMap<String, String>,
}

impl MappingConfig {
    /// Create an empty config (every lookup passes through)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hub→external status mapping
    pub fn with_status_to_external(
        mut self,
        hub: impl Into<String>,
        external: impl Into<String>,
    ) -> Self {
        self.status_to_external.insert(hub.into(), external.into());
        self
    }

    /// Add an external→hub status mapping
    pub fn with_status_to_hub(
        mut self,
        external: impl Into<String>,
        hub: impl Into<String>,
    ) -> Self {
        self.status_to_hub.insert(external.into(), hub.into());
        self
    }

    /// Add a hub→external priority mapping
    pub fn with_priority_to_external(
        mut self,
        hub: impl Into<String>,
        external: impl Into<String>,
    ) -> Self {
        self.priority_to_external
            .insert(hub.into(), external.into());
        self
    }

    /// Add a hub→external user mapping
    pub fn with_user_to_external(
        mut self,
        hub_user: impl Into<String>,
        mapping: UserIdMapping,
    ) -> Self {
        self.user_to_external.insert(hub_user.into(), mapping);
        self
    }

    /// Add an external→hub user mapping
    pub fn with_user_to_hub(
        mut self,
        external_user: impl Into<String>,
        hub_user: impl Into<String>,
    ) -> Self {
        self.user_to_hub.insert(external_user.into(), hub_user.into());
        self
    }
}
