//! Trailing-edge debouncing driven by an external clock.
//!
//! The guide is single-threaded, so nothing sleeps or spawns here. Callers
//! schedule work with the current instant and later [`Debouncer::poll`] with
//! a newer one; work fires once the delay has passed since the last
//! schedule. Scheduling again replaces the pending value and restarts the
//! delay, so only the latest value is ever delivered.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
  value: T,
  due: Instant,
}

/// A single cancellable pending task.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Schedules `value`, superseding anything pending.
  pub fn schedule(&mut self, value: T, now: Instant) {
    self.pending = Some(Pending {
      value,
      due: now + self.delay,
    });
  }

  /// Drops the pending value. Returns `true` if there was one.
  pub fn cancel(&mut self) -> bool {
    self.pending.take().is_some()
  }

  /// Takes the pending value if its delay has elapsed at `now`.
  pub fn poll(&mut self, now: Instant) -> Option<T> {
    let due = self.due_at()?;
    if now < due {
      return None;
    }
    self.pending.take().map(|p| p.value)
  }

  /// Takes the pending value immediately, regardless of its deadline.
  pub fn flush(&mut self) -> Option<T> {
    self.pending.take().map(|p| p.value)
  }

  pub fn is_pending(&self) -> bool {
    self.pending.is_some()
  }

  /// When the pending value becomes due, if any.
  pub fn due_at(&self) -> Option<Instant> {
    self.pending.as_ref().map(|p| p.due)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DELAY: Duration = Duration::from_millis(300);

  #[test]
  fn test_fires_after_delay() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);
    debouncer.schedule("museum", start);

    assert_eq!(debouncer.poll(start + Duration::from_millis(299)), None);
    assert_eq!(debouncer.poll(start + DELAY), Some("museum"));
    assert_eq!(debouncer.poll(start + DELAY * 2), None);
  }

  #[test]
  fn test_last_writer_wins() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);
    debouncer.schedule("m", start);
    debouncer.schedule("mu", start + Duration::from_millis(200));
    debouncer.schedule("mus", start + Duration::from_millis(400));

    // The first deadline has passed but was superseded.
    assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
    assert_eq!(debouncer.poll(start + Duration::from_millis(700)), Some("mus"));
    assert!(!debouncer.is_pending());
  }

  #[test]
  fn test_cancel_and_flush() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);
    debouncer.schedule(1, start);
    assert!(debouncer.cancel());
    assert!(!debouncer.cancel());
    assert_eq!(debouncer.poll(start + DELAY), None);

    debouncer.schedule(2, start);
    assert_eq!(debouncer.due_at(), Some(start + DELAY));
    assert_eq!(debouncer.flush(), Some(2));
    assert_eq!(debouncer.flush(), None);
  }
}
