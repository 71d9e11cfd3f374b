use std::time;

/// Floor of every delay.
pub const BASE_DELAY: time::Duration = time::Duration::from_millis(50);

/// Ceiling of every delay.
pub const MAX_DELAY: time::Duration = time::Duration::from_millis(4000);

/// Next delay of a decorrelated jitter sequence.
///
/// `min(MAX_DELAY, random(0, 1) * previous * 3 + BASE_DELAY)`: the first retry (`previous`
/// of zero) always waits [`BASE_DELAY`], later ones spread out.
///
/// ```rust
/// use dynamodb_facade::common::backoff;
/// use std::time::Duration;
///
/// assert_eq!(backoff::next_delay(Duration::ZERO), backoff::BASE_DELAY);
/// assert!(backoff::next_delay(Duration::from_secs(60)) <= backoff::MAX_DELAY);
/// ```
pub fn next_delay(previous: time::Duration) -> time::Duration {
    jittered(previous, rand::random::<f64>())
}

fn jittered(previous: time::Duration, sample: f64) -> time::Duration {
    // anything above the ceiling is capped anyway
    let previous = previous.min(MAX_DELAY);
    let spread = previous.mul_f64(sample * 3.0);
    (spread + BASE_DELAY).min(MAX_DELAY)
}

/// Retry ceiling for batch operations.
///
/// The default never gives up: a batch is retried until the service reports nothing left.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries per chunk, `None` for unbounded.
    pub max_retries: Option<usize>,
}

impl RetryPolicy {
    /// Give up after `max_retries` retries of the same chunk.
    pub fn bounded(max_retries: usize) -> Self {
        Self {
            max_retries: Some(max_retries),
        }
    }

    pub(crate) fn allows(&self, retries: usize) -> bool {
        self.max_retries.is_none_or(|max_retries| retries < max_retries)
    }
}
