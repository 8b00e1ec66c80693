use std::time::Duration;

use crate::ReplayError;

/// Topic the reader falls back to when none is given on the command line.
pub const DEFAULT_TOPIC: &str = "/demo/taq:trades";

/// How long the reader waits on an empty channel before giving up.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// A record pulled back off the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedRecord {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
}

/// Consumption side of the external message transport.
pub trait Consumer {
    fn subscribe(&mut self, topics: &[&str]) -> Result<(), ReplayError>;

    /// Waits up to `timeout` for a batch of records. An empty batch means the
    /// channel stayed idle the whole time.
    fn poll(&mut self, timeout: Duration) -> Vec<ConsumedRecord>;

    fn close(self);
}

/// Prints everything coming off the channel until it stays idle for a full
/// `timeout`, then returns the total received.
pub fn drain<C: Consumer>(consumer: &mut C, timeout: Duration) -> u64 {
    let mut total = 0;
    loop {
        let batch = consumer.poll(timeout);
        if batch.is_empty() {
            println!("No messages after {} second wait.", timeout.as_secs());
            return total;
        }

        println!("Read {} messages", batch.len());
        total += batch.len() as u64;
        for record in &batch {
            println!(
                "Consuming {}: {}",
                String::from_utf8_lossy(record.key.as_deref().unwrap_or_default()),
                String::from_utf8_lossy(record.value.as_deref().unwrap_or_default()),
            );
        }
    }
}
