//! External ticket system
//!
//! Models the far side of the bridge: an independently-evolving ticket store
//! that accepts synced tickets, assigns them external identifiers, and keeps
//! mutating them on its own schedule.
//!
//! # Lifecycle
//!
//! 1. **Accept**: the sync adapter hands over a validated, mapped ticket; the
//!    store assigns an external id and deep link and returns synchronously.
//! 2. **Propagate**: a dedicated background task per ticket sleeps for a
//!    randomized pause, mutates the ticket's status and priority, and pushes
//!    the result back through the adapter's outbound path. The loop repeats
//!    until shutdown.
//! 3. **Shutdown**: a broadcast signal stops every propagation task; a task
//!    cancelled mid-sleep exits without its pending mutation.
//!
//! # Telemetry
//!
//! Every transition is published on a broadcast event stream so observers
//! (and tests) can follow accepts, mutations, sync outcomes, and the silent
//! terminal stop without polling.

mod propagation;
mod store;

pub use store::{
    ExternalStore, ExternalStoreConfig, DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_MAX_PAUSE,
    DEFAULT_TICKET_URL,
};

/// Events emitted by the external store and its propagation tasks
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// A new ticket was accepted and assigned an external id
    Accepted {
        external_id: String,
        hub_id: String,
    },

    /// An already-known ticket was updated in place
    Updated { external_id: String },

    /// A propagation task mutated a ticket's status/priority
    Mutated {
        external_id: String,
        status: String,
        priority: String,
    },

    /// An outbound sync reached the hub
    OutboundSynced { external_id: String },

    /// An outbound sync failed; the propagation loop continues
    OutboundFailed {
        external_id: String,
        error: String,
    },

    /// A propagation task terminated without further propagation
    PropagationStopped { external_id: String },
}
