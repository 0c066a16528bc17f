//! Adapter Configuration
//!
//! Settings are layered: built-in defaults, an optional TOML file,
//! `KAFKA_ADAPTER_*` environment variables, then command-line flags. The
//! result is validated once into an immutable [`AdapterConfig`].

use std::path::PathBuf;
use std::time::Duration;

use broker_publisher::KafkaConfig;
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use drain_scheduler::SchedulerConfig;
use intake_queue::{OverflowPolicy, DEFAULT_CAPACITY};
use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::routes::ingest::MAX_BODY_BYTES;

/// Prefix for environment overrides, e.g. `KAFKA_ADAPTER_KAFKA_TOPIC`
pub const ENV_PREFIX: &str = "KAFKA_ADAPTER";

/// Command-line flags
#[derive(Debug, Default, Parser)]
#[command(name = "kafka-adapter", version, about = "Republish alert webhooks onto a Kafka topic")]
pub struct Cli {
    #[arg(long, short = 'c', help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "HTTP listen port")]
    pub port: Option<u16>,

    #[arg(long, help = "Kafka brokers, comma separated host:port")]
    pub kafka_address: Option<String>,

    #[arg(long, help = "Destination Kafka topic")]
    pub kafka_topic: Option<String>,

    #[arg(long, help = "Partition assigned to every record")]
    pub kafka_partition: Option<i32>,

    #[arg(long, help = "Leader acknowledgment timeout in milliseconds")]
    pub ack_timeout_ms: Option<u64>,

    #[arg(long, help = "Log file; empty logs to stderr")]
    pub log_file: Option<String>,

    #[arg(long, help = "Log level: debug, info, warn, error, fatal")]
    pub log_level: Option<String>,

    #[arg(long, help = "Entries each intake queue can hold")]
    pub queue_capacity: Option<usize>,

    #[arg(long, help = "Full queue behavior: block or reject")]
    pub overflow: Option<String>,

    #[arg(long, help = "Milliseconds between drain cycles")]
    pub drain_interval_ms: Option<u64>,

    #[arg(long, help = "Largest accepted webhook body in bytes")]
    pub max_body_bytes: Option<usize>,

    #[arg(long, help = "Serve Prometheus metrics on this port")]
    pub metrics_port: Option<u16>,
}

/// Configuration errors; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("please input kafka address")]
    MissingKafkaAddress,

    #[error("please input kafka topic")]
    MissingKafkaTopic,

    #[error("Invalid log level '{0}' (expected debug, info, warn, error or fatal)")]
    InvalidLogLevel(String),

    #[error("Invalid overflow policy: {0}")]
    InvalidOverflow(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    port: u16,
    kafka_address: String,
    kafka_topic: String,
    kafka_partition: i32,
    ack_timeout_ms: u64,
    log_file: String,
    log_level: String,
    queue_capacity: usize,
    overflow: String,
    drain_interval_ms: u64,
    max_body_bytes: usize,
    #[serde(default)]
    metrics_port: Option<u16>,
}

/// Validated, immutable process configuration
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub port: u16,
    pub kafka_hosts: Vec<String>,
    pub kafka_topic: String,
    pub kafka_partition: i32,
    pub ack_timeout: Duration,
    /// `None` logs to stderr
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
    pub queue_capacity: usize,
    pub overflow: OverflowPolicy,
    pub drain_interval: Duration,
    pub max_body_bytes: usize,
    pub metrics_port: Option<u16>,
}

impl AdapterConfig {
    /// Build the configuration from every source, flags taking precedence
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("port", 28082)?
            .set_default("kafka_address", "")?
            .set_default("kafka_topic", "")?
            .set_default("kafka_partition", 0)?
            .set_default("ack_timeout_ms", 1000)?
            .set_default("log_file", "kafka-adapter.log")?
            .set_default("log_level", "info")?
            .set_default("queue_capacity", DEFAULT_CAPACITY as i64)?
            .set_default("overflow", "block")?
            .set_default("drain_interval_ms", 3000)?
            .set_default("max_body_bytes", MAX_BODY_BYTES as i64)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        let raw: RawSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("port", cli.port.map(i64::from))?
            .set_override_option("kafka_address", cli.kafka_address.clone())?
            .set_override_option("kafka_topic", cli.kafka_topic.clone())?
            .set_override_option("kafka_partition", cli.kafka_partition.map(i64::from))?
            .set_override_option("ack_timeout_ms", cli.ack_timeout_ms.map(|v| v as i64))?
            .set_override_option("log_file", cli.log_file.clone())?
            .set_override_option("log_level", cli.log_level.clone())?
            .set_override_option("queue_capacity", cli.queue_capacity.map(|v| v as i64))?
            .set_override_option("overflow", cli.overflow.clone())?
            .set_override_option("drain_interval_ms", cli.drain_interval_ms.map(|v| v as i64))?
            .set_override_option("max_body_bytes", cli.max_body_bytes.map(|v| v as i64))?
            .set_override_option("metrics_port", cli.metrics_port.map(i64::from))?
            .build()?
            .try_deserialize()?;

        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let kafka_hosts = split_hosts(&raw.kafka_address);
        if kafka_hosts.is_empty() {
            return Err(ConfigError::MissingKafkaAddress);
        }
        let kafka_topic = raw.kafka_topic.trim().to_string();
        if kafka_topic.is_empty() {
            return Err(ConfigError::MissingKafkaTopic);
        }
        if raw.queue_capacity == 0 {
            return Err(ConfigError::Zero("queue_capacity"));
        }
        if raw.drain_interval_ms == 0 {
            return Err(ConfigError::Zero("drain_interval_ms"));
        }
        if raw.max_body_bytes == 0 {
            return Err(ConfigError::Zero("max_body_bytes"));
        }

        let log_file = match raw.log_file.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        Ok(Self {
            port: raw.port,
            kafka_hosts,
            kafka_topic,
            kafka_partition: raw.kafka_partition,
            ack_timeout: Duration::from_millis(raw.ack_timeout_ms),
            log_file,
            log_level: parse_level(&raw.log_level)?,
            queue_capacity: raw.queue_capacity,
            overflow: raw.overflow.parse().map_err(ConfigError::InvalidOverflow)?,
            drain_interval: Duration::from_millis(raw.drain_interval_ms),
            max_body_bytes: raw.max_body_bytes,
            metrics_port: raw.metrics_port,
        })
    }

    /// Producer settings for the broker publisher
    pub fn kafka_config(&self) -> KafkaConfig {
        KafkaConfig {
            hosts: self.kafka_hosts.clone(),
            ack_timeout: self.ack_timeout,
            ..KafkaConfig::default()
        }
    }

    /// Settings for the drain scheduler
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: self.drain_interval,
            topic: self.kafka_topic.clone(),
            partition: self.kafka_partition,
        }
    }
}

fn split_hosts(address: &str) -> Vec<String> {
    address
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(String::from)
        .collect()
}

/// `fatal` has no tracing equivalent and maps to `error`
fn parse_level(level: &str) -> Result<Level, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" | "fatal" => Ok(Level::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}
