use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::client::ClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer as _};
use rdkafka::message::{BorrowedMessage, Message as _};
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::util::Timeout;

use super::{Channel, ChannelError, DeliveryCallback};
use crate::consumer::ConsumedRecord;
use crate::ReplayError;

const POLL_BATCH_MAX: usize = 500;

struct DeliveryContext;

impl ClientContext for DeliveryContext {}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = Box<DeliveryCallback>;

    fn delivery(&self, result: &DeliveryResult<'_>, on_delivery: Self::DeliveryOpaque) {
        match result {
            Ok(_) => on_delivery(Ok(())),
            Err((e, _)) => on_delivery(Err(ChannelError::Delivery(e.to_string()))),
        }
    }
}

/// Kafka-backed channel. librdkafka's polling thread runs the delivery
/// callbacks, concurrent with the paced publish loop.
pub struct KafkaChannel {
    producer: Arc<ThreadedProducer<DeliveryContext>>,
}

impl KafkaChannel {
    pub fn connect(brokers: &str) -> Result<KafkaChannel, ReplayError> {
        let producer = producer_config(brokers)
            .create_with_context(DeliveryContext)
            .map_err(|e| ReplayError::Config(format!("failed to create kafka producer: {}", e)))?;

        Ok(KafkaChannel {
            producer: Arc::new(producer),
        })
    }
}

#[async_trait]
impl Channel for KafkaChannel {
    fn publish(&self, topic: &str, key: &[u8], value: &[u8], on_delivery: DeliveryCallback) {
        let record = BaseRecord::with_opaque_to(topic, Box::new(on_delivery))
            .key(key)
            .payload(value);

        if let Err((e, record)) = self.producer.send(record) {
            // never reached the queue, fail it right here
            let on_delivery = record.delivery_opaque;
            on_delivery(Err(ChannelError::Delivery(e.to_string())));
        }
    }

    async fn flush(&self) {
        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(Timeout::Never))
            .await
            .expect("failed to wait for flush");
    }

    async fn close(self) {
        // dropping the producer stops its polling thread
    }
}

pub fn producer_config(brokers: &str) -> ClientConfig {
    let mut config = ClientConfig::new();

    config.set("bootstrap.servers", brokers);
    config.set("message.timeout.ms", "30000");

    config
}

/// Kafka-backed consumer for the reader binary.
pub struct KafkaReader {
    consumer: BaseConsumer,
}

impl KafkaReader {
    pub fn connect(brokers: &str, group_id: &str) -> Result<KafkaReader, ReplayError> {
        let consumer = consumer_config(brokers, group_id)
            .create()
            .map_err(|e| ReplayError::Config(format!("failed to create kafka consumer: {}", e)))?;

        Ok(KafkaReader { consumer })
    }
}

impl crate::consumer::Consumer for KafkaReader {
    fn subscribe(&mut self, topics: &[&str]) -> Result<(), ReplayError> {
        self.consumer
            .subscribe(topics)
            .map_err(|e| ReplayError::Config(format!("failed to subscribe: {}", e)))
    }

    fn poll(&mut self, timeout: Duration) -> Vec<ConsumedRecord> {
        let mut batch = Vec::new();

        match self.consumer.poll(timeout) {
            None => return batch,
            Some(Err(e)) => {
                log::error!("poll failed: {}", e);
                return batch;
            }
            Some(Ok(msg)) => batch.push(consumed(&msg)),
        }

        // grab whatever else is already buffered locally
        while batch.len() < POLL_BATCH_MAX {
            match self.consumer.poll(Duration::from_millis(0)) {
                Some(Ok(msg)) => batch.push(consumed(&msg)),
                Some(Err(e)) => {
                    log::error!("poll failed: {}", e);
                    break;
                }
                None => break,
            }
        }
        batch
    }

    fn close(self) {}
}

fn consumed(msg: &BorrowedMessage<'_>) -> ConsumedRecord {
    ConsumedRecord {
        key: msg.key().map(|k| k.to_vec()),
        value: msg.payload().map(|v| v.to_vec()),
    }
}

pub fn consumer_config(brokers: &str, group_id: &str) -> ClientConfig {
    let mut config = ClientConfig::new();

    config.set("group.id", group_id);
    config.set("bootstrap.servers", brokers);
    config.set("enable.partition.eof", "false");
    config.set("session.timeout.ms", "6000");
    config.set("auto.offset.reset", "earliest");

    config
}
