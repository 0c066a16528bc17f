//! Broker Publishing
//!
//! One publish call per normalized record, awaited to completion:
//! - Kafka producer requiring the partition leader's acknowledgment
//! - Caller-assigned partitions, no partitioner logic here
//! - No retry or buffering; a failed publish is reported once and dropped

mod in_memory;
mod producer;

pub use in_memory::{InMemoryPublisher, PublishedRecord};
pub use producer::{KafkaConfig, KafkaPublisher};

use std::future::Future;
use thiserror::Error;

/// Broker error types
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Publish failed: {0}")]
    Send(String),

    #[error("Producer is closed")]
    Closed,

    #[error("Producer lock poisoned")]
    Poisoned,

    #[error("Publish task failed: {0}")]
    Join(String),
}

/// Anything that can deliver an encoded record to a topic partition
pub trait Publisher: Send + Sync + 'static {
    /// Publish one payload and wait for the broker's answer
    fn publish(
        &self,
        topic: &str,
        partition: i32,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), BrokerError>> + Send;
}
