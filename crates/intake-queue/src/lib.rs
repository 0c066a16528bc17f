//! Intake Queues
//!
//! Bounded FIFO buffers that decouple HTTP request handlers from the
//! publishing path. One queue per webhook source; the queue itself is the
//! only synchronization point between the two sides.

mod queue;

pub use queue::{
    bounded, OverflowPolicy, QueueError, QueueReceiver, QueueSender, DEFAULT_CAPACITY,
};

use alert_schema::{AlertMessage, GrafanaAlertMessage};
use tracing::info;

/// Producer handles for both sources
#[derive(Debug, Clone)]
pub struct IntakeQueues {
    pub alertmanager: QueueSender<AlertMessage>,
    pub grafana: QueueSender<GrafanaAlertMessage>,
}

/// Consumer handles for both sources
#[derive(Debug)]
pub struct IntakeReceivers {
    pub alertmanager: QueueReceiver<AlertMessage>,
    pub grafana: QueueReceiver<GrafanaAlertMessage>,
}

/// Create both intake queues with a shared capacity and overflow policy
pub fn intake_queues(capacity: usize, policy: OverflowPolicy) -> (IntakeQueues, IntakeReceivers) {
    info!(
        "Creating intake queues: capacity={}, overflow={:?}",
        capacity, policy
    );
    let (am_tx, am_rx) = bounded(capacity, policy);
    let (gf_tx, gf_rx) = bounded(capacity, policy);
    (
        IntakeQueues {
            alertmanager: am_tx,
            grafana: gf_tx,
        },
        IntakeReceivers {
            alertmanager: am_rx,
            grafana: gf_rx,
        },
    )
}
