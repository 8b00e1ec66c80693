use async_trait::async_trait;

pub mod in_memory;
pub mod kafka;

/// Fired exactly once per publish by the channel's delivery machinery,
/// possibly on a different thread than the caller's.
pub type DeliveryCallback = Box<dyn FnOnce(Result<(), ChannelError>) + Send + Sync>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Publish side of the external message transport.
#[async_trait]
pub trait Channel: Send {
    /// Hands a record to the transport and returns immediately, without
    /// waiting for broker acknowledgment.
    fn publish(&self, topic: &str, key: &[u8], value: &[u8], on_delivery: DeliveryCallback);

    /// Waits until every prior publish has been acknowledged or failed.
    async fn flush(&self);

    /// Releases transport resources.
    async fn close(self);
}
