//! Courtesy delays between remote mutations.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Fixed-interval scheduler.
///
/// [`Pacer::wait`] returns once `interval` has elapsed since the previous
/// `wait` returned; the first call waits the full interval from the moment it
/// is made. A zero interval never sleeps.
#[derive(Debug, Clone)]
pub struct Pacer {
  interval: Duration,
  last: Option<Instant>,
}

impl Pacer {
  pub fn new(interval: Duration) -> Self {
    Self { interval, last: None }
  }

  pub fn from_secs(seconds: u64) -> Self {
    Self::new(Duration::from_secs(seconds))
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  pub async fn wait(&mut self) {
    if self.interval.is_zero() {
      return;
    }

    let start = self.last.unwrap_or_else(Instant::now);
    let deadline = start + self.interval;
    debug!("Waiting {:?} before the next change", deadline.saturating_duration_since(Instant::now()));
    sleep_until(deadline).await;
    self.last = Some(Instant::now());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_about(elapsed: Duration, expected: Duration) {
    assert!(
      elapsed >= expected && elapsed < expected + Duration::from_millis(10),
      "elapsed {elapsed:?}, expected {expected:?}"
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_first_wait_takes_full_interval() {
    let mut pacer = Pacer::from_secs(30);
    let before = Instant::now();
    pacer.wait().await;
    assert_about(before.elapsed(), Duration::from_secs(30));
  }

  #[tokio::test(start_paused = true)]
  async fn test_interval_measured_from_previous_wait() {
    let mut pacer = Pacer::from_secs(120);
    let before = Instant::now();
    pacer.wait().await;

    // Work that takes part of the interval shortens the next wait
    tokio::time::sleep(Duration::from_secs(20)).await;
    pacer.wait().await;
    assert_about(before.elapsed(), Duration::from_secs(240));

    // Work longer than the interval means no wait at all
    tokio::time::sleep(Duration::from_secs(300)).await;
    let after_work = Instant::now();
    pacer.wait().await;
    assert_about(after_work.elapsed(), Duration::ZERO);
  }

  #[tokio::test(start_paused = true)]
  async fn test_zero_interval_never_sleeps() {
    let mut pacer = Pacer::new(Duration::ZERO);
    let before = Instant::now();
    for _ in 0..5 {
      pacer.wait().await;
    }
    assert_about(before.elapsed(), Duration::ZERO);
  }
}
