//! Drain Scheduler Implementation

use std::sync::Arc;
use std::time::Duration;

use alert_schema::SourceKind;
use broker_publisher::Publisher;
use intake_queue::{IntakeReceivers, QueueReceiver};
use metrics::{counter, gauge};
use normalizer::Envelope;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Configuration for the drain scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Sleep between drain cycles (default: 3s)
    pub interval: Duration,
    /// Destination topic for every record
    pub topic: String,
    /// Partition assigned to every record (default: 0)
    pub partition: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            topic: "alerts".to_string(),
            partition: 0,
        }
    }
}

/// Counters for a single drain cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Envelopes dequeued across both queues
    pub envelopes: usize,
    /// Records the broker accepted
    pub published: usize,
    /// Records dropped because they could not be encoded
    pub encode_failures: usize,
    /// Records dropped because the broker rejected them
    pub publish_failures: usize,
}

/// Drains the intake queues on a fixed cadence
pub struct DrainScheduler<P> {
    receivers: IntakeReceivers,
    publisher: Arc<P>,
    config: SchedulerConfig,
    cycles: u64,
}

impl<P: Publisher> DrainScheduler<P> {
    /// Create a scheduler owning the consumer side of both queues
    pub fn new(receivers: IntakeReceivers, publisher: Arc<P>, config: SchedulerConfig) -> Self {
        info!(
            "Drain scheduler created: interval={:?}, topic={}, partition={}",
            config.interval, config.topic, config.partition
        );
        Self {
            receivers,
            publisher,
            config,
            cycles: 0,
        }
    }

    /// Run drain cycles until `shutdown` flips to `true` or its sender drops
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting drain scheduler");

        while !*shutdown.borrow() {
            let stats = self.drain_cycle().await;
            if stats.envelopes > 0 {
                info!(
                    "Cycle {}: {} envelopes, {} published, {} encode failures, {} publish failures",
                    self.cycles,
                    stats.envelopes,
                    stats.published,
                    stats.encode_failures,
                    stats.publish_failures
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Drain scheduler stopped after {} cycles", self.cycles);
    }

    /// Process every entry queued at the moment the cycle starts.
    ///
    /// Entries enqueued while the cycle runs wait for the next one.
    pub async fn drain_cycle(&mut self) -> CycleStats {
        self.cycles += 1;
        let mut stats = CycleStats::default();

        let pending = self.receivers.alertmanager.len();
        for _ in 0..pending {
            let Some(message) = self.receivers.alertmanager.try_dequeue() else {
                break;
            };
            self.process(Envelope::Alertmanager(message), &mut stats).await;
        }

        let pending = self.receivers.grafana.len();
        for _ in 0..pending {
            let Some(message) = self.receivers.grafana.try_dequeue() else {
                break;
            };
            self.process(Envelope::Grafana(message), &mut stats).await;
        }

        record_depth(SourceKind::Alertmanager, &self.receivers.alertmanager);
        record_depth(SourceKind::Grafana, &self.receivers.grafana);
        stats
    }

    async fn process(&self, envelope: Envelope, stats: &mut CycleStats) {
        let kind = envelope.source();
        stats.envelopes += 1;

        for payload in envelope.encode() {
            let payload = match payload {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Dropping {} record: {}", kind, e);
                    counter!("adapter_encode_failures_total", "source" => kind.as_str())
                        .increment(1);
                    stats.encode_failures += 1;
                    continue;
                }
            };

            debug!("Publishing {} record: {}", kind, String::from_utf8_lossy(&payload));
            match self
                .publisher
                .publish(&self.config.topic, self.config.partition, payload)
                .await
            {
                Ok(()) => {
                    counter!("adapter_records_published_total", "source" => kind.as_str())
                        .increment(1);
                    stats.published += 1;
                }
                Err(e) => {
                    error!("Push {} record to topic {} failed: {}", kind, self.config.topic, e);
                    counter!("adapter_publish_failures_total", "source" => kind.as_str())
                        .increment(1);
                    stats.publish_failures += 1;
                }
            }
        }
    }

    /// Number of cycles run so far
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }
}

fn record_depth<T>(kind: SourceKind, queue: &QueueReceiver<T>) {
    gauge!("adapter_queue_depth", "source" => kind.as_str()).set(queue.len() as f64);
}
