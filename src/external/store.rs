//! In-memory external ticket store

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::propagation::spawn_propagation;
use super::BridgeEvent;
use crate::error::{BridgeError, Result};
use crate::services::OutboundSync;
use crate::ticket::Ticket;

/// Default base URL for external deep links
pub const DEFAULT_TICKET_URL: &str = "https://external/tickets";

/// Default upper bound on the pause between external mutations (3 minutes)
pub const DEFAULT_MAX_PAUSE: Duration = Duration::from_secs(180);

/// Default event channel capacity
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1000;

const DEFAULT_STATUSES: &[&str] = &[
    "Open",
    "In progress",
    "On hold",
    "Resolved",
    "Closed",
    "Canceled",
];

const DEFAULT_PRIORITIES: &[&str] = &["Critical", "Major", "Minor", "Informational"];

/// External store configuration
#[derive(Debug, Clone)]
pub struct ExternalStoreConfig {
    /// Base URL prepended to external ids to form deep links
    pub base_url: String,

    /// The external system's status vocabulary
    pub statuses: Vec<String>,

    /// The external system's priority vocabulary
    pub priorities: Vec<String>,

    /// Upper bound on the randomized pause between mutations
    pub max_pause: Duration,

    /// Event broadcast channel capacity
    pub event_channel_capacity: usize,
}

impl Default for ExternalStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TICKET_URL.to_string(),
            statuses: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
            priorities: DEFAULT_PRIORITIES.iter().map(|s| s.to_string()).collect(),
            max_pause: DEFAULT_MAX_PAUSE,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl ExternalStoreConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for deep links
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the status vocabulary
    pub fn with_statuses(mut self, statuses: Vec<String>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Set the priority vocabulary
    pub fn with_priorities(mut self, priorities: Vec<String>) -> Self {
        self.priorities = priorities;
        self
    }

    /// Set the maximum pause between mutations
    pub fn with_max_pause(mut self, max_pause: Duration) -> Self {
        self.max_pause = max_pause;
        self
    }
}

/// The external system's ticket repository
///
/// Tickets are keyed by their external id. Each accepted ticket owns exactly
/// one propagation task; the map entry is written only by `accept` and by
/// that task, so no two tasks ever race on one ticket.
pub struct ExternalStore {
    config: ExternalStoreConfig,

    /// Tickets by external id
    tickets: RwLock<HashMap<String, Ticket>>,

    /// Outbound sink back into the bridge, wired after construction
    outbound: RwLock<Option<Arc<dyn OutboundSync>>>,

    /// Propagation task registry, drained on shutdown
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,

    /// Shutdown signal for every propagation task
    shutdown_tx: broadcast::Sender<()>,

    /// Event stream
    event_tx: broadcast::Sender<BridgeEvent>,
}

impl ExternalStore {
    /// Create a store with the given configuration
    pub fn new(config: ExternalStoreConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        Self {
            config,
            tickets: RwLock::new(HashMap::new()),
            outbound: RwLock::new(None),
            tasks: Mutex::new(HashMap::new()),
            shutdown_tx,
            event_tx,
        }
    }

    /// Wire the outbound sync sink (the adapter) into the store
    pub fn connect(&self, outbound: Arc<dyn OutboundSync>) {
        *self.outbound.write().unwrap() = Some(outbound);
    }

    /// Get an event subscriber
    pub fn events(&self) -> broadcast::Receiver<BridgeEvent> {
        self.event_tx.subscribe()
    }

    /// Accept a ticket from the bridge
    ///
    /// A ticket without an external id gets a freshly generated one plus a
    /// deep link, is added to the store, and gets its propagation task. A
    /// ticket that already carries a known external id updates the stored
    /// entry in place; its existing task keeps running and no second id is
    /// ever assigned.
    ///
    /// Returns the accepted ticket synchronously; the propagation task never
    /// blocks the caller.
    pub fn accept(self: &Arc<Self>, mut ticket: Ticket) -> Result<Ticket> {
        if let Some(external_id) = ticket.external_id.clone() {
            let mut tickets = self.tickets.write().unwrap();
            if !tickets.contains_key(&external_id) {
                return Err(BridgeError::TicketNotFound(external_id));
            }
            tickets.insert(external_id.clone(), ticket.clone());
            drop(tickets);

            debug!(external_id = %external_id, "Updated existing external ticket");
            self.emit(BridgeEvent::Updated { external_id });
            return Ok(ticket);
        }

        let external_id = Uuid::new_v4().to_string();
        ticket.external_id = Some(external_id.clone());
        ticket.external_link = Some(format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            external_id
        ));

        self.tickets
            .write()
            .unwrap()
            .insert(external_id.clone(), ticket.clone());

        let handle = spawn_propagation(Arc::clone(self), external_id.clone());
        self.tasks
            .lock()
            .unwrap()
            .insert(external_id.clone(), handle);

        info!(external_id = %external_id, hub_id = %ticket.hub_id, "Accepted ticket");
        self.emit(BridgeEvent::Accepted {
            external_id,
            hub_id: ticket.hub_id.clone(),
        });

        Ok(ticket)
    }

    /// Mutate a ticket now and sync it outbound immediately
    ///
    /// The externally-driven equivalent of what the propagation task does on
    /// its own schedule; the mutation lands in the store even when the
    /// outbound sync fails.
    pub async fn mutate_now(
        &self,
        external_id: &str,
        status: impl Into<String>,
        priority: impl Into<String>,
    ) -> Result<()> {
        self.apply_mutation(external_id, status.into(), priority.into())
            .await
    }

    /// Number of tickets in the store
    pub fn len(&self) -> usize {
        self.tickets.read().unwrap().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.tickets.read().unwrap().is_empty()
    }

    /// Fetch a ticket by external id
    pub fn get(&self, external_id: &str) -> Option<Ticket> {
        self.tickets.read().unwrap().get(external_id).cloned()
    }

    /// Whether a ticket with this external id exists
    pub fn contains(&self, external_id: &str) -> bool {
        self.tickets.read().unwrap().contains_key(external_id)
    }

    /// Stop all propagation tasks and wait for them to exit
    ///
    /// A task cancelled while sleeping exits without performing its pending
    /// mutation or sync.
    pub async fn shutdown(&self) {
        info!("Stopping external store propagation tasks");
        let _ = self.shutdown_tx.send(());

        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.drain().map(|(_, handle)| handle).collect()
        };
        let count = handles.len();
        futures::future::join_all(handles).await;
        debug!(tasks = count, "Propagation tasks drained");
    }

    pub(super) fn config(&self) -> &ExternalStoreConfig {
        &self.config
    }

    pub(super) fn shutdown_signal(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub(super) fn emit(&self, event: BridgeEvent) {
        // Err just means nobody is listening right now
        let _ = self.event_tx.send(event);
    }

    /// Write a mutation into the store and push it through the outbound sink
    pub(super) async fn apply_mutation(
        &self,
        external_id: &str,
        status: String,
        priority: String,
    ) -> Result<()> {
        let ticket = {
            let mut tickets = self.tickets.write().unwrap();
            let ticket = tickets
                .get_mut(external_id)
                .ok_or_else(|| BridgeError::TicketNotFound(external_id.to_string()))?;
            ticket.status = status.clone();
            ticket.priority = priority.clone();
            ticket.touch();
            ticket.clone()
        };

        debug!(external_id = %external_id, status = %status, priority = %priority, "Ticket mutated externally");
        self.emit(BridgeEvent::Mutated {
            external_id: external_id.to_string(),
            status,
            priority,
        });

        let outbound = self.outbound.read().unwrap().clone();
        let Some(sink) = outbound else {
            warn!(external_id = %external_id, "No outbound sink connected; mutation not propagated");
            return Err(BridgeError::Transport(
                "no outbound sink connected".to_string(),
            ));
        };

        let tenant = ticket.tenant_id.clone();
        match sink.sync_outbound(ticket, &tenant).await {
            Ok(()) => {
                self.emit(BridgeEvent::OutboundSynced {
                    external_id: external_id.to_string(),
                });
                Ok(())
            }
            Err(e) => {
                warn!(external_id = %external_id, error = %e, "Outbound sync failed");
                self.emit(BridgeEvent::OutboundFailed {
                    external_id: external_id.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
