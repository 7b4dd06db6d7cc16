//! Backoff retrier for store operations.
//!
//! Every data operation runs through [`Retrier::run`]: it waits for
//! connectivity, retries transient failures with exponential backoff up to
//! an attempt ceiling, and hands terminal failures straight back.

use metrics::counter;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::connectivity::Connectivity;
use super::error_message;
use super::retry_policy::{RetryPolicy, Retryability};
use crate::error::StoreError;
use crate::models::DataResult;

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
        }
    }
}

impl RetryConfig {
    /// Delay after the failed attempt numbered `attempt` (0-based):
    /// `min(initial * 2^attempt, max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Runs store operations with retry and connectivity gating.
#[derive(Debug, Clone)]
pub struct Retrier {
    config: RetryConfig,
    policy: Arc<RetryPolicy>,
    connectivity: Connectivity,
}

impl Retrier {
    pub fn new(config: RetryConfig, policy: RetryPolicy, connectivity: Connectivity) -> Self {
        Self {
            config,
            policy: Arc::new(policy),
            connectivity,
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn classify(&self, error: &StoreError) -> Retryability {
        self.policy.classify(error, self.connectivity.is_online())
    }

    /// Runs `op` until it succeeds, fails terminally, or attempts run out.
    ///
    /// Returns the last error on failure.
    pub async fn run<T, F, Fut>(&self, op_name: &'static str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt: u32 = 0;

        loop {
            if !self.connectivity.is_online() {
                debug!(operation = op_name, "Offline, waiting for connectivity");
                self.connectivity.wait_until_online().await;
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let retryability = self.classify(&error);
                    let retryable_label = match retryability {
                        Retryability::Retryable => "true",
                        Retryability::Terminal => "false",
                    };
                    counter!(
                        "store_errors_total",
                        "operation" => op_name,
                        "retryable" => retryable_label
                    )
                    .increment(1);

                    if retryability == Retryability::Terminal {
                        debug!(operation = op_name, error = %error, "Terminal store error");
                        return Err(error);
                    }

                    if attempt + 1 >= self.config.max_attempts {
                        warn!(
                            operation = op_name,
                            attempts = attempt + 1,
                            error = %error,
                            "Retries exhausted"
                        );
                        return Err(error);
                    }

                    let delay = self.config.delay_for(attempt);
                    warn!(
                        operation = op_name,
                        attempt = attempt + 1,
                        max_attempts = self.config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying store operation"
                    );
                    counter!("store_retry_attempts_total", "operation" => op_name).increment(1);

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Like [`run`](Self::run) but folds the outcome into a [`DataResult`].
    pub async fn execute<T, F, Fut>(&self, op_name: &'static str, op: F) -> DataResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        match self.run(op_name, op).await {
            Ok(value) => DataResult::ok(value),
            Err(error) => self.to_data_result(&error),
        }
    }

    /// Normalizes a failure into the user-facing result shape.
    pub fn to_data_result<T>(&self, error: &StoreError) -> DataResult<T> {
        let transient = self.classify(error) == Retryability::Retryable;
        let (code, message) = error_message::describe(error, transient);
        DataResult::err(code, message)
    }
}

impl Default for Retrier {
    fn default() -> Self {
        Self::new(
            RetryConfig::default(),
            RetryPolicy::default(),
            Connectivity::default(),
        )
    }
}
