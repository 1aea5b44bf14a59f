//! Integration tests for TicketBridge
//!
//! These tests drive the full bridge: inbound sync through validation and
//! mapping into the external store, external mutations propagating back to
//! the hub, and shutdown behavior under concurrency.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use ticketbridge::adapter::SyncAdapter;
use ticketbridge::external::{BridgeEvent, ExternalStore, ExternalStoreConfig};
use ticketbridge::mapping::{ConfigStore, MappingConfig, UserIdMapping};
use ticketbridge::mocks::{sample_config, RecordingHub, StaticConfigService};
use ticketbridge::ticket::{Attachment, Ticket};
use ticketbridge::BridgeError;

/// Helper to build a fully wired bridge over one tenant's config
fn build_bridge(
    tenant: &str,
    config: MappingConfig,
    store_config: ExternalStoreConfig,
) -> (
    Arc<SyncAdapter>,
    Arc<ExternalStore>,
    Arc<RecordingHub>,
    Arc<StaticConfigService>,
) {
    let service = Arc::new(StaticConfigService::new().with_config(tenant, config));
    let config_store = Arc::new(ConfigStore::new(service.clone()));
    let store = Arc::new(ExternalStore::new(store_config));
    let hub = Arc::new(RecordingHub::new());
    let adapter = Arc::new(SyncAdapter::new(config_store, store.clone(), hub.clone()));
    adapter.start();
    (adapter, store, hub, service)
}

/// Helper to create a complete hub-side ticket
fn hub_ticket(hub_id: &str) -> Ticket {
    Ticket::new(
        hub_id,
        format!("https://hub/tickets/{}", hub_id),
        "acme",
        "Printer down",
    )
    .with_description("The office printer stopped responding")
    .with_status("Open")
    .with_priority("Major")
    .with_requester("john.doe@acme.com")
}

mod inbound_sync_tests {
    use super::*;

    #[tokio::test]
    async fn test_inbound_sets_both_identifiers() {
        let (adapter, store, _hub, _service) =
            build_bridge("acme", sample_config(), ExternalStoreConfig::default());

        let accepted = adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();

        assert_eq!(accepted.hub_id, "SYM-1");
        let external_id = accepted.external_id.expect("external id assigned");
        assert!(accepted
            .external_link
            .unwrap()
            .ends_with(&external_id));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&external_id));

        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_inbound_applies_tenant_mapping() {
        let (adapter, store, _hub, _service) =
            build_bridge("acme", sample_config(), ExternalStoreConfig::default());

        let accepted = adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();

        assert_eq!(accepted.status, "In progress");
        assert_eq!(accepted.priority, "5");
        assert_eq!(accepted.requester.as_deref(), Some("jdoe"));

        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_unmapped_status_passes_through_unchanged() {
        // No status tables at all: mapping is a no-op, not an error
        let config = MappingConfig::new()
            .with_user_to_external("john.doe@acme.com", UserIdMapping::new("jdoe", "username"));
        let (adapter, store, _hub, _service) =
            build_bridge("acme", config, ExternalStoreConfig::default());

        let accepted = adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();
        assert_eq!(accepted.status, "Open");
        assert_eq!(accepted.priority, "Major");

        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_config_unavailable_aborts_sync() {
        let (adapter, store, hub, _service) = build_bridge(
            "someone-else",
            sample_config(),
            ExternalStoreConfig::default(),
        );

        // Ticket's tenant has no config; the collaborator fails the fetch
        let err = adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap_err();
        assert!(matches!(err, BridgeError::ConfigUnavailable { .. }));
        assert!(store.is_empty());
        assert!(hub.pushed().is_empty());
    }
}

mod validation_gate_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_field_keeps_store_and_hub_untouched() {
        let (adapter, store, hub, _service) =
            build_bridge("acme", sample_config(), ExternalStoreConfig::default());

        let mut ticket = hub_ticket("SYM-1");
        ticket.subject.clear();

        let err = adapter.sync_inbound(ticket).await.unwrap_err();
        assert!(err.to_string().contains("ticket.subject"));
        assert!(store.is_empty());
        assert!(hub.pushed().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_without_size_is_rejected() {
        let (adapter, store, hub, _service) =
            build_bridge("acme", sample_config(), ExternalStoreConfig::default());

        let ticket = hub_ticket("SYM-1").with_attachment(Attachment {
            name: "log.txt".to_string(),
            creator: "john.doe@acme.com".to_string(),
            link: "https://hub/attachments/9".to_string(),
            size: None,
        });

        let err = adapter.sync_inbound(ticket).await.unwrap_err();
        assert!(err.to_string().contains("attachment.size"));
        assert_eq!(store.len(), 0);
        assert!(hub.pushed().is_empty());
    }
}

mod mapping_direction_tests {
    use super::*;

    #[tokio::test]
    async fn test_user_mapping_asymmetry_survives_round_trip() {
        // Outbound a -> x is configured; inbound has no entry for x
        let config = MappingConfig::new()
            .with_status_to_hub("Resolved", "Close")
            .with_user_to_external("a", UserIdMapping::new("x", "username"));
        let (adapter, store, hub, _service) =
            build_bridge("acme", config, ExternalStoreConfig::default());

        let ticket = hub_ticket("SYM-1").with_requester("a");
        let accepted = adapter.sync_inbound(ticket).await.unwrap();
        assert_eq!(accepted.requester.as_deref(), Some("x"));

        let external_id = accepted.external_id.unwrap();
        store
            .mutate_now(&external_id, "Resolved", "Minor")
            .await
            .unwrap();

        // Inbound has no mapping for "x": the external identity is kept as-is
        let pushed = hub.last_pushed().unwrap();
        assert_eq!(pushed.requester.as_deref(), Some("x"));
        assert_eq!(pushed.status, "Close");

        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_end_to_end_status_translation() {
        // Tenant T1: hub "Open" -> external "In progress";
        // external "Resolved" -> hub "Close"
        let config = MappingConfig::new()
            .with_status_to_external("Open", "In progress")
            .with_status_to_hub("Resolved", "Close")
            .with_user_to_external("john.doe@acme.com", UserIdMapping::new("jdoe", "username"));
        let (adapter, store, hub, _service) =
            build_bridge("acme", config, ExternalStoreConfig::default());

        let accepted = adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();
        assert_eq!(accepted.status, "In progress");

        let external_id = accepted.external_id.unwrap();
        store
            .mutate_now(&external_id, "Resolved", "Major")
            .await
            .unwrap();

        let pushed = hub.last_pushed().unwrap();
        assert_eq!(pushed.status, "Close");
        assert_eq!(pushed.external_id.as_deref(), Some(external_id.as_str()));
        assert_eq!(pushed.hub_id, "SYM-1");

        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_pushed_config_update_applies_to_later_syncs() {
        let initial = sample_config();
        let (adapter, store, _hub, service) =
            build_bridge("acme", initial, ExternalStoreConfig::default());

        let first = adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();
        assert_eq!(first.status, "In progress");

        // The collaborator pushes a replacement config for the tenant
        service.push_update(
            "acme".into(),
            sample_config().with_status_to_external("Open", "Reopened"),
        );

        let second = adapter.sync_inbound(hub_ticket("SYM-2")).await.unwrap();
        assert_eq!(second.status, "Reopened");

        store.shutdown().await;
    }
}

mod propagation_tests {
    use super::*;

    #[tokio::test]
    async fn test_propagation_loop_drives_outbound_sync() {
        let store_config = ExternalStoreConfig::new().with_max_pause(Duration::from_millis(20));
        let (adapter, store, hub, _service) =
            build_bridge("acme", sample_config(), store_config);

        let mut events = store.events();
        adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();

        // Wait for the background loop to mutate and sync at least once
        let mut saw_mutation = false;
        let mut saw_outbound = false;
        let deadline = tokio::time::timeout(Duration::from_secs(5), async {
            while !(saw_mutation && saw_outbound) {
                match events.recv().await {
                    Ok(BridgeEvent::Mutated { .. }) => saw_mutation = true,
                    Ok(BridgeEvent::OutboundSynced { .. }) => saw_outbound = true,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        })
        .await;

        assert!(deadline.is_ok(), "propagation never reached the hub");
        assert!(!hub.pushed().is_empty());

        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_outbound_failure_keeps_loop_alive() {
        let store_config = ExternalStoreConfig::new().with_max_pause(Duration::from_millis(20));
        let (adapter, store, hub, _service) =
            build_bridge("acme", sample_config(), store_config);
        hub.set_failing(true);

        let mut events = store.events();
        adapter.sync_inbound(hub_ticket("SYM-1")).await.unwrap();

        // Two failed iterations prove the loop survives sync errors
        let mut failures = 0;
        let deadline = tokio::time::timeout(Duration::from_secs(5), async {
            while failures < 2 {
                if let Ok(BridgeEvent::OutboundFailed { .. }) = events.recv().await {
                    failures += 1;
                }
            }
        })
        .await;

        assert!(deadline.is_ok(), "loop died after a failed outbound sync");
        assert!(hub.pushed().is_empty());

        store.shutdown().await;
    }
}

mod shutdown_tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_mid_flight_leaves_store_consistent() {
        // Long pauses so most tasks are cancelled while sleeping
        let store_config = ExternalStoreConfig::new().with_max_pause(Duration::from_secs(60));
        let (adapter, store, _hub, _service) =
            build_bridge("acme", sample_config(), store_config);

        let mut events = store.events();

        let count = 8;
        let mut external_ids = HashSet::new();
        for i in 0..count {
            let accepted = adapter
                .sync_inbound(hub_ticket(&format!("SYM-{}", i)))
                .await
                .unwrap();
            external_ids.insert(accepted.external_id.unwrap());
        }
        assert_eq!(external_ids.len(), count, "external ids must be unique");
        assert_eq!(store.len(), count);

        store.shutdown().await;

        // Every propagation task reports its silent terminal stop
        let mut stopped = 0;
        let deadline = tokio::time::timeout(Duration::from_secs(5), async {
            while stopped < count {
                match events.recv().await {
                    Ok(BridgeEvent::PropagationStopped { .. }) => stopped += 1,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        })
        .await;

        assert!(deadline.is_ok(), "not all propagation tasks stopped");
        assert_eq!(store.len(), count);

        // A cancelled task performs no pending mutation after shutdown
        for id in &external_ids {
            assert!(store.get(id).is_some());
        }
    }

    #[tokio::test]
    async fn test_shutdown_with_no_tickets_is_immediate() {
        let (_adapter, store, _hub, _service) =
            build_bridge("acme", sample_config(), ExternalStoreConfig::default());
        store.shutdown().await;
        assert!(store.is_empty());
    }
}
