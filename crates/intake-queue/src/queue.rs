//! Bounded Intake Queue Implementation

use std::str::FromStr;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;

/// Default queue capacity (entries per source)
pub const DEFAULT_CAPACITY: usize = 1000;

/// What `enqueue` does when the queue is at capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Wait for the drain scheduler to make room
    #[default]
    Block,
    /// Fail immediately with [`QueueError::Full`]
    Reject,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(OverflowPolicy::Block),
            "reject" => Ok(OverflowPolicy::Reject),
            other => Err(format!("unknown overflow policy '{other}' (expected block or reject)")),
        }
    }
}

/// Errors returned by [`QueueSender::enqueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Queue at capacity under [`OverflowPolicy::Reject`]
    #[error("intake queue is full ({0} entries)")]
    Full(usize),

    /// The consuming side has been dropped
    #[error("intake queue is closed")]
    Closed,
}

/// Create a bounded FIFO queue with the given capacity and overflow policy.
///
/// A capacity of zero is raised to one.
pub fn bounded<T>(capacity: usize, policy: OverflowPolicy) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (QueueSender { tx, policy }, QueueReceiver { rx })
}

/// Producer handle, cloned into every request handler
#[derive(Debug)]
pub struct QueueSender<T> {
    tx: mpsc::Sender<T>,
    policy: OverflowPolicy,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            policy: self.policy,
        }
    }
}

impl<T> QueueSender<T> {
    /// Append an entry, applying the overflow policy when full
    pub async fn enqueue(&self, item: T) -> Result<(), QueueError> {
        match self.policy {
            OverflowPolicy::Block => self.tx.send(item).await.map_err(|_| QueueError::Closed),
            OverflowPolicy::Reject => self.tx.try_send(item).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    warn!("Intake queue full, rejecting entry");
                    QueueError::Full(self.capacity())
                }
                mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
            }),
        }
    }

    /// Entries currently queued (including reserved slots)
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued entries
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Overflow policy in effect
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}

/// Consumer handle, owned by the drain scheduler
#[derive(Debug)]
pub struct QueueReceiver<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> QueueReceiver<T> {
    /// Entries queued at this instant
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Remove the oldest entry without waiting
    pub fn try_dequeue(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
