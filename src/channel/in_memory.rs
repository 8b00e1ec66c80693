use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Channel, ChannelError, DeliveryCallback};

/// What a test saw go over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedRecord {
    pub topic: String,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// In-memory stand-in for the kafka channel. Deliveries complete
/// synchronously inside `publish`, with the configured outcome.
pub struct InMemoryChannel {
    records: Arc<Mutex<Vec<PublishedRecord>>>,
    fail_deliveries: bool,
}

impl InMemoryChannel {
    pub fn new() -> InMemoryChannel {
        InMemoryChannel::with_outcome(false)
    }

    /// A channel whose broker rejects every record.
    pub fn failing() -> InMemoryChannel {
        InMemoryChannel::with_outcome(true)
    }

    fn with_outcome(fail_deliveries: bool) -> InMemoryChannel {
        InMemoryChannel {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_deliveries,
        }
    }

    /// Handle that outlives the channel, for inspection after close.
    pub fn records(&self) -> Arc<Mutex<Vec<PublishedRecord>>> {
        self.records.clone()
    }
}

impl Default for InMemoryChannel {
    fn default() -> InMemoryChannel {
        InMemoryChannel::new()
    }
}

#[async_trait]
impl Channel for InMemoryChannel {
    fn publish(&self, topic: &str, key: &[u8], value: &[u8], on_delivery: DeliveryCallback) {
        self.records
            .lock()
            .expect("records lock poisoned")
            .push(PublishedRecord {
                topic: topic.to_string(),
                key: key.to_vec(),
                value: value.to_vec(),
            });

        if self.fail_deliveries {
            on_delivery(Err(ChannelError::Delivery(
                "rejected by test channel".to_string(),
            )));
        } else {
            on_delivery(Ok(()));
        }
    }

    async fn flush(&self) {}

    async fn close(self) {}
}
