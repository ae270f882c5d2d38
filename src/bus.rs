//! Intent bus abstraction.
//!
//! Two implementations:
//!
//! - **KafkaBus**: production implementation. One producer per publish,
//!   synchronous delivery-ack wait bounded by the configured timeout.
//! - **InMemoryBus**: broadcast-channel implementation for tests and local
//!   development.

use async_trait::async_trait;
use futures::stream::BoxStream;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::types::RDKafkaErrorCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Broker protocol version the producer is pinned to.
const BROKER_PROTOCOL_VERSION: &str = "0.10.1";

/// Errors that can occur when publishing to the bus
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("publish to '{topic}' timed out waiting for broker ack: {message}")]
    PublishTimeout { topic: String, message: String },

    #[error("broker error on '{topic}': {message}")]
    Broker { topic: String, message: String },
}

pub type BusResult<T> = Result<T, BusError>;

/// A message observed on the bus (in-memory implementation only).
#[derive(Debug, Clone)]
pub struct BusMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Publish-side bus abstraction.
///
/// Implementations must block until the broker acknowledges the message or
/// the configured timeout elapses; there is no retry at this layer.
#[async_trait]
pub trait IntentBus: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> BusResult<()>;
}

/// Kafka-backed bus.
///
/// Connection-per-call: each publish creates a fresh producer and drops it
/// after the single send attempt, success or failure.
pub struct KafkaBus {
    bootstrap: String,
    timeout: Duration,
}

impl KafkaBus {
    pub fn new(bootstrap: String, timeout: Duration) -> Self {
        Self { bootstrap, timeout }
    }
}

#[async_trait]
impl IntentBus for KafkaBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> BusResult<()> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &self.bootstrap)
            .set("broker.version.fallback", BROKER_PROTOCOL_VERSION)
            .set("message.timeout.ms", self.timeout.as_millis().to_string())
            .create()
            .map_err(|err| BusError::Broker {
                topic: topic.to_string(),
                message: err.to_string(),
            })?;

        let record: FutureRecord<'_, [u8], _> = FutureRecord::to(topic).payload(&payload);

        match producer.send(record, self.timeout).await {
            Ok(_) => Ok(()),
            Err((err, _)) if is_delivery_timeout(&err) => Err(BusError::PublishTimeout {
                topic: topic.to_string(),
                message: err.to_string(),
            }),
            Err((err, _)) => Err(BusError::Broker {
                topic: topic.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

fn is_delivery_timeout(err: &KafkaError) -> bool {
    matches!(
        err,
        KafkaError::MessageProduction(RDKafkaErrorCode::MessageTimedOut)
    )
}

/// In-memory bus backed by a tokio broadcast channel.
#[derive(Clone)]
pub struct InMemoryBus {
    sender: Arc<broadcast::Sender<BusMessage>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Stream of messages published to exactly `topic`.
    pub fn subscribe(&self, topic: &str) -> BoxStream<'static, BusMessage> {
        let mut rx = self.sender.subscribe();
        let topic = topic.to_string();
        Box::pin(async_stream::stream! {
            while let Ok(msg) = rx.recv().await {
                if msg.topic == topic {
                    yield msg;
                }
            }
        })
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentBus for InMemoryBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> BusResult<()> {
        // A send with no live subscribers is still a successful publish.
        let _ = self.sender.send(BusMessage {
            topic: topic.to_string(),
            payload,
        });
        Ok(())
    }
}
