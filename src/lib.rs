pub mod channel;
pub mod consumer;
pub mod pacing;
pub mod record;
pub mod session;
pub mod source;

pub use channel::{Channel, ChannelError, DeliveryCallback};
pub use consumer::{ConsumedRecord, Consumer};
pub use record::ParsedRecord;
pub use session::{ReplaySession, ReplayStats};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed record '{line}': {reason}")]
    MalformedRecord { line: String, reason: &'static str },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
