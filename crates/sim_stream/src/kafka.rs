//! Kafka sink: one record per vehicle snapshot, keyed by vehicle id.

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaResult;
use rdkafka::producer::{BaseRecord, DefaultProducerContext, Producer, ThreadedProducer};
use sim_core::error::PublishError;
use sim_core::publisher::Publisher;
use tracing::info;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct KafkaPublisher {
    producer: ThreadedProducer<DefaultProducerContext>,
    topic: String,
}

impl KafkaPublisher {
    /// Connects with full acknowledgement and up to 5 delivery retries.
    pub fn new(brokers: &[String], topic: &str) -> KafkaResult<Self> {
        let producer: ThreadedProducer<DefaultProducerContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("acks", "all")
            .set("retries", "5")
            .create()?;
        info!(brokers = %brokers.join(","), topic, "kafka producer initialized");
        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }
}

impl Publisher for KafkaPublisher {
    /// Enqueues the record; delivery happens on the producer's polling thread.
    fn send(&mut self, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        self.producer
            .send(BaseRecord::to(&self.topic).key(key).payload(payload))
            .map_err(|(error, _record)| PublishError::Rejected(error.to_string()))
    }

    fn flush(&mut self) -> Result<(), PublishError> {
        self.producer
            .flush(FLUSH_TIMEOUT)
            .map_err(|error| PublishError::Rejected(error.to_string()))
    }
}
