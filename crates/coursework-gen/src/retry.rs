//! Exponential backoff around a single generation request.
//!
//! Only rate-limit errors are retried. Every other failure, including an
//! empty payload, is returned straight away.

use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::traits::{GenerateError, TextGenerator};

/// Backoff settings shared by every generation call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound for the exponential part of the delay
    pub max_delay: Duration,

    /// Total number of attempts, the first one included
    pub max_attempts: u32,

    /// Width of the uniform random jitter added to every delay
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            max_attempts: 10,
            jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Fresh state for one logical call.
    pub fn state(&self) -> RetryState {
        RetryState::new(self.initial_delay, self.max_delay)
    }
}

/// Progress of one retried call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryState {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            attempt: 0,
            base_delay,
            max_delay,
        }
    }

    /// Number of rate-limited failures seen so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// `min(base * 2^attempt, max)`, without jitter.
    pub fn backoff(&self) -> Duration {
        let factor = 2u32.checked_pow(self.attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Record one more rate-limited failure.
    pub fn advance(&mut self) {
        self.attempt += 1;
    }
}

/// Uniform random duration in `[0, span)`.
pub fn jitter(span: Duration) -> Duration {
    if span.is_zero() {
        return Duration::ZERO;
    }
    let fraction: f64 = rand::thread_rng().gen_range(0.0..1.0);
    span.mul_f64(fraction)
}

/// Call `generator` with `prompt`, backing off while it reports rate limiting.
///
/// # Errors
///
/// Returns [`GenerateError::EmptyResponse`] for a blank payload,
/// [`GenerateError::RetriesExhausted`] once `policy.max_attempts` calls were
/// all rate limited, and any other generator error unchanged.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<String, GenerateError> {
    let mut state = policy.state();

    loop {
        match generator.generate(prompt).await {
            Ok(text) if text.trim().is_empty() => return Err(GenerateError::EmptyResponse),
            Ok(text) => return Ok(text),

            Err(e) if e.is_rate_limited() => {
                let attempt = state.attempt() + 1;
                if attempt >= policy.max_attempts {
                    warn!(
                        "Attempt {}/{}: {} still rate limited, giving up",
                        attempt,
                        policy.max_attempts,
                        generator.name()
                    );
                    return Err(GenerateError::RetriesExhausted { attempts: attempt });
                }

                let delay = state.backoff() + jitter(policy.jitter);
                warn!(
                    "Attempt {}/{}: {} returned 429. Retrying in {:.2} seconds...",
                    attempt,
                    policy.max_attempts,
                    generator.name(),
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                state.advance();
            }

            Err(e) => {
                warn!("{} failed with a non-429 error: {}", generator.name(), e);
                return Err(e);
            }
        }
    }
}
