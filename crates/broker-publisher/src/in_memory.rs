//! In-Memory Publisher

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{BrokerError, Publisher};

/// A payload captured by [`InMemoryPublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub topic: String,
    pub partition: i32,
    pub payload: Vec<u8>,
}

/// Publisher that keeps every record in memory.
///
/// Attempts are numbered from zero in call order; attempts listed in
/// `failing` return [`BrokerError::Send`] and are not recorded.
#[derive(Clone, Default)]
pub struct InMemoryPublisher {
    records: Arc<Mutex<Vec<PublishedRecord>>>,
    attempts: Arc<AtomicUsize>,
    failing: Arc<HashSet<usize>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given attempt numbers
    pub fn failing_on(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing: Arc::new(attempts.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    pub async fn published(&self) -> Vec<PublishedRecord> {
        self.records.lock().await.clone()
    }

    /// Published payloads decoded as UTF-8, for assertions
    pub async fn published_payloads(&self) -> Vec<String> {
        self.records
            .lock()
            .await
            .iter()
            .map(|r| String::from_utf8_lossy(&r.payload).into_owned())
            .collect()
    }
}

impl Publisher for InMemoryPublisher {
    async fn publish(
        &self,
        topic: &str,
        partition: i32,
        payload: Vec<u8>,
    ) -> Result<(), BrokerError> {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(&attempt) {
            return Err(BrokerError::Send(format!("injected failure on attempt {attempt}")));
        }
        self.records.lock().await.push(PublishedRecord {
            topic: topic.to_string(),
            partition,
            payload,
        });
        Ok(())
    }
}
