use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

/// Ticks wrap at this value.
pub const TICK_MODULUS: u16 = 1000;

/// Inter-record wait in milliseconds, derived from two consecutive ticks.
///
/// A current tick smaller than the previous one means the cycle rolled over,
/// not that time went backwards. Equal ticks are a zero wait, never a full
/// cycle.
pub fn delay(previous: u16, current: u16) -> u16 {
    if current >= previous {
        current - previous
    } else {
        (current + TICK_MODULUS) - previous
    }
}

/// Seam for the pacing sleep so tests can capture requested delays instead of
/// serving them.
#[async_trait]
pub trait Waiter: Send {
    async fn wait(&mut self, delay: Duration);
}

/// Production waiter. Blocking between records is the point of the replay, so
/// this really sleeps.
pub struct SleepWaiter;

#[async_trait]
impl Waiter for SleepWaiter {
    async fn wait(&mut self, delay: Duration) {
        if delay > Duration::from_millis(0) {
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_always_within_one_cycle() {
        for previous in 0..TICK_MODULUS {
            for current in 0..TICK_MODULUS {
                let d = delay(previous, current);
                assert!(d < TICK_MODULUS, "delay({}, {}) = {}", previous, current, d);
            }
        }
    }

    #[test]
    fn equal_ticks_mean_no_wait() {
        for tick in &[0, 1, 499, 999] {
            assert_eq!(delay(*tick, *tick), 0);
        }
    }

    #[test]
    fn wraparound_counts_through_the_cycle_boundary() {
        assert_eq!(delay(998, 2), 4);
        assert_eq!(delay(999, 0), 1);
    }

    #[test]
    fn forward_ticks_are_a_plain_difference() {
        assert_eq!(delay(100, 250), 150);
        assert_eq!(delay(0, 999), 999);
    }
}
