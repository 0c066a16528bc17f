//! Kafka Publisher Implementation

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kafka::producer::{Producer, Record, RequiredAcks};
use tracing::{debug, info};

use crate::{BrokerError, Publisher};

/// Kafka producer configuration
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Bootstrap brokers as `host:port`
    pub hosts: Vec<String>,
    /// How long the leader may take to acknowledge a record
    pub ack_timeout: Duration,
    /// Client id reported to the brokers
    pub client_id: String,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["localhost:9092".to_string()],
            ack_timeout: Duration::from_secs(1),
            client_id: "kafka-adapter".to_string(),
        }
    }
}

/// Publisher backed by a synchronous Kafka producer.
///
/// Every record waits for the partition leader's acknowledgment. The
/// blocking send runs on tokio's blocking pool; callers await it, so
/// publishes stay strictly sequential.
#[derive(Clone)]
pub struct KafkaPublisher {
    producer: Arc<Mutex<Option<Producer>>>,
}

impl KafkaPublisher {
    /// Connect to the cluster and load topic metadata.
    ///
    /// Blocks on network I/O; call it from a blocking context.
    pub fn connect(config: &KafkaConfig) -> Result<Self, BrokerError> {
        let producer = Producer::from_hosts(config.hosts.clone())
            .with_client_id(config.client_id.clone())
            .with_ack_timeout(config.ack_timeout)
            .with_required_acks(RequiredAcks::One)
            .create()
            .map_err(|e| BrokerError::Connect(e.to_string()))?;

        info!("Connected to Kafka brokers: {}", config.hosts.join(","));
        Ok(Self {
            producer: Arc::new(Mutex::new(Some(producer))),
        })
    }

    /// Drop the producer and its broker connections
    pub fn close(&self) {
        match self.producer.lock() {
            Ok(mut guard) => {
                if guard.take().is_some() {
                    info!("Kafka producer closed");
                }
            }
            Err(poisoned) => {
                poisoned.into_inner().take();
            }
        }
    }

    /// Check whether the producer has been closed
    pub fn is_closed(&self) -> bool {
        self.producer
            .lock()
            .map(|guard| guard.is_none())
            .unwrap_or(true)
    }
}

impl Publisher for KafkaPublisher {
    async fn publish(
        &self,
        topic: &str,
        partition: i32,
        payload: Vec<u8>,
    ) -> Result<(), BrokerError> {
        let producer = Arc::clone(&self.producer);
        let topic = topic.to_string();

        tokio::task::spawn_blocking(move || {
            let mut guard = producer.lock().map_err(|_| BrokerError::Poisoned)?;
            let producer = guard.as_mut().ok_or(BrokerError::Closed)?;

            debug!("Sending {} bytes to {}/{}", payload.len(), topic, partition);
            let record =
                Record::from_value(topic.as_str(), payload.as_slice()).with_partition(partition);
            producer
                .send(&record)
                .map_err(|e| BrokerError::Send(e.to_string()))
        })
        .await
        .map_err(|e| BrokerError::Join(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_publisher() -> KafkaPublisher {
        KafkaPublisher {
            producer: Arc::new(Mutex::new(None)),
        }
    }

    #[test]
    fn test_default_config() {
        let config = KafkaConfig::default();
        assert_eq!(config.hosts, vec!["localhost:9092".to_string()]);
        assert_eq!(config.ack_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_closed_publisher_rejects() {
        let publisher = closed_publisher();
        assert!(publisher.is_closed());

        let err = publisher.publish("alerts", 0, b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, BrokerError::Closed));
    }

    #[test]
    fn test_connect_unreachable_broker_fails() {
        let config = KafkaConfig {
            hosts: vec!["127.0.0.1:1".to_string()],
            ..Default::default()
        };
        let err = KafkaPublisher::connect(&config).err().unwrap();
        assert!(matches!(err, BrokerError::Connect(_)));
    }
}
