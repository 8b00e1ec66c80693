use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::channel::{Channel, ChannelError};
use crate::pacing::{self, Waiter};
use crate::record;
use crate::source;
use crate::ReplayError;

/// Delivery tallies shared with the channel's callback machinery. Callbacks
/// land on foreign threads, so both counters are atomic.
#[derive(Default)]
pub struct DeliveryCounter {
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl DeliveryCounter {
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    fn record(&self, result: Result<(), ChannelError>) {
        match result {
            Ok(()) => {
                self.delivered.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                log::error!("delivery failed: {}", e);
            }
        }
    }
}

/// Final tallies returned by [`ReplaySession::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Drives one replay end to end: file enumeration, parsing, paced publishing
/// and the once-per-second throughput report. Created per invocation and
/// consumed by `run`.
pub struct ReplaySession<C, W> {
    topic: String,
    stats_topic: String,
    channel: C,
    waiter: W,
    counter: Arc<DeliveryCounter>,
    last_tick: u16,
    started: Instant,
    last_update: u64,
}

impl<C: Channel, W: Waiter> ReplaySession<C, W> {
    pub fn new(topic: &str, channel: C, waiter: W) -> ReplaySession<C, W> {
        ReplaySession {
            stats_topic: format!("{}_stats", topic),
            topic: topic.to_string(),
            channel,
            waiter,
            counter: Arc::new(DeliveryCounter::default()),
            last_tick: 0,
            started: Instant::now(),
            last_update: 0,
        }
    }

    pub fn counter(&self) -> Arc<DeliveryCounter> {
        self.counter.clone()
    }

    /// Replays every file under `input`. A bad line or an unreadable file
    /// abandons that file and moves on; only a bad input path is fatal.
    pub async fn run(mut self, input: &Path) -> Result<ReplayStats, ReplayError> {
        let files = source::resolve_inputs(input)?;
        println!("Publishing data from {} files.", files.len());

        for file in &files {
            if let Err(e) = self.replay_file(file).await {
                log::error!("abandoning {}: {}", file.display(), e);
            }
        }

        self.channel.flush().await;
        let stats = ReplayStats {
            delivered: self.counter.delivered(),
            failed: self.counter.failed(),
        };
        println!("Published {} messages to stream.", stats.delivered);
        println!("Finished.");
        self.channel.close().await;

        Ok(stats)
    }

    async fn replay_file(&mut self, path: &Path) -> Result<(), ReplayError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        for line in reader.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let parsed = record::parse_line(&line)?;

            let counter = self.counter.clone();
            self.channel.publish(
                &self.topic,
                parsed.key,
                parsed.payload,
                Box::new(move |result| counter.record(result)),
            );

            let wait = pacing::delay(self.last_tick, parsed.tick);
            self.last_tick = parsed.tick;
            self.waiter.wait(Duration::from_millis(u64::from(wait))).await;

            self.report_progress().await;
        }
        Ok(())
    }

    /// Emits the throughput line and the stats record once per elapsed whole
    /// second, on the first record to cross the boundary.
    async fn report_progress(&mut self) {
        let elapsed = self.started.elapsed();
        if elapsed.as_secs() <= self.last_update {
            return;
        }
        self.last_update += 1;

        // flush first so the delivered count is current
        self.channel.flush().await;
        let delivered = self.counter.delivered();
        let rate = delivered as f64 / elapsed.as_secs_f64() / 1000.0;
        println!(
            "Throughput = {:.2} Kmsgs/sec published. Total published = {}.",
            rate, delivered
        );

        // fire and forget, a lost stats record never stalls the replay
        self.channel.publish(
            &self.stats_topic,
            elapsed.as_micros().to_string().as_bytes(),
            rate.to_string().as_bytes(),
            Box::new(|result| {
                if let Err(e) = result {
                    log::debug!("stats publish failed: {}", e);
                }
            }),
        );
    }
}
