//! Retry/backoff controller — the sole authority on whether a failure is
//! retried.
//!
//! The attempt bound and backoff schedule live in an explicit `RetryState`
//! driven by a plain loop, not in counters captured by recursive closures,
//! so both are independently testable. Each attempt re-invokes the full
//! pipeline from prompt composition through extraction; no partial state
//! carries over between attempts.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::generation::classify::{classify, ClassifiedError};

/// Automatic retries after the first attempt: 4 attempts total.
pub const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 1000;
const MAX_DELAY_MS: u64 = 4000;

/// Delay before retry `n` (1-based): 1s, 2s, 4s, capped at 4s.
pub fn backoff_delay(retry: u32) -> Duration {
    debug_assert!(retry >= 1);
    let millis = BASE_DELAY_MS
        .saturating_mul(1u64 << (retry.saturating_sub(1)).min(16))
        .min(MAX_DELAY_MS);
    Duration::from_millis(millis)
}

/// The terminal failure of a generation operation: the classified error of
/// the last attempt, annotated with how many attempts were made. Attempts
/// is 0 when validation rejected the inputs before any gateway call.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{error} (after {attempts} attempt(s))")]
pub struct GenerationFailure {
    pub error: ClassifiedError,
    pub attempts: u32,
}

impl GenerationFailure {
    /// A failure raised synchronously before the first attempt.
    pub fn before_first_attempt(error: &GenerationError) -> Self {
        GenerationFailure {
            error: classify(error),
            attempts: 0,
        }
    }
}

/// Per-run retry bookkeeping.
#[derive(Debug)]
pub struct RetryState {
    pub attempt: u32,
    pub max_attempts: u32,
    pub last_error: Option<ClassifiedError>,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        RetryState {
            attempt: 0,
            max_attempts,
            last_error: None,
        }
    }
}

/// Runs `operation` up to `MAX_RETRIES + 1` times. The closure receives the
/// 1-based attempt number and must rebuild its request from scratch — the
/// controller guarantees nothing survives a failed attempt except the
/// classified error it records.
pub async fn run_with_retry<T, F, Fut>(mut operation: F) -> Result<T, GenerationFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut state = RetryState::new(MAX_RETRIES + 1);

    loop {
        state.attempt += 1;

        match operation(state.attempt).await {
            Ok(value) => {
                if state.attempt > 1 {
                    info!("Generation succeeded on attempt {}", state.attempt);
                }
                return Ok(value);
            }
            Err(error) => {
                let classified = state.last_error.insert(classify(&error));

                if !classified.retryable || state.attempt >= state.max_attempts {
                    return Err(GenerationFailure {
                        error: classified.clone(),
                        attempts: state.attempt,
                    });
                }

                let delay = backoff_delay(state.attempt);
                warn!(
                    "Attempt {}/{} failed ({}): retrying after {}ms",
                    state.attempt,
                    state.max_attempts,
                    classified.message,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
