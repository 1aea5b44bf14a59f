//! Per-ticket propagation tasks
//!
//! Every accepted ticket gets one long-lived task that simulates the external
//! system's independent lifecycle: sleep for a randomized bounded pause,
//! mutate the ticket's status and priority, sync the result back to the hub,
//! and go around again. Iterations of one task are strictly sequential;
//! tasks for different tickets run in parallel with no ordering between them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::store::ExternalStore;
use super::BridgeEvent;

/// Spawn the propagation loop for one accepted ticket
///
/// The loop stops only on the store's shutdown signal (or if the ticket
/// vanishes from the store). Cancellation mid-sleep skips the pending
/// mutation and sync entirely; no retry is attempted.
pub(super) fn spawn_propagation(store: Arc<ExternalStore>, external_id: String) -> JoinHandle<()> {
    let mut shutdown = store.shutdown_signal();

    tokio::spawn(async move {
        loop {
            let pause = random_pause(store.config().max_pause);
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!(external_id = %external_id, "Propagation stopped before pending mutation");
                    store.emit(BridgeEvent::PropagationStopped {
                        external_id: external_id.clone(),
                    });
                    return;
                }
                _ = tokio::time::sleep(pause) => {}
            }

            let Some(current) = store.get(&external_id) else {
                warn!(external_id = %external_id, "Ticket no longer in store; stopping propagation");
                store.emit(BridgeEvent::PropagationStopped {
                    external_id: external_id.clone(),
                });
                return;
            };

            let status = pick_other(&current.status, &store.config().statuses);
            let priority = pick_other(&current.priority, &store.config().priorities);

            // A failed sync skips this iteration only; the loop reschedules
            if let Err(e) = store.apply_mutation(&external_id, status, priority).await {
                warn!(external_id = %external_id, error = %e, "Propagation iteration failed");
            }
        }
    })
}

/// Randomized pause below the configured maximum
fn random_pause(max_pause: Duration) -> Duration {
    let max_millis = max_pause.as_millis().max(1) as u64;
    Duration::from_millis(pseudo_random(max_millis))
}

/// Pick a vocabulary entry different from the current value when possible
fn pick_other(current: &str, vocabulary: &[String]) -> String {
    if vocabulary.is_empty() {
        return current.to_string();
    }
    let index = pseudo_random(vocabulary.len() as u64) as usize;
    if vocabulary[index] != current {
        return vocabulary[index].clone();
    }
    vocabulary[(index + 1) % vocabulary.len()].clone()
}

/// Simple pseudo-random value in `[0, bound)` without an external dependency
fn pseudo_random(bound: u64) -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % bound.max(1)
}
