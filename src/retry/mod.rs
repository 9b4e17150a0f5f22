//! Retry executor with exponential backoff
//!
//! [`Retry`] invokes a fallible operation until it succeeds or the attempt budget
//! is spent, waiting between failures, and always reports the outcome as a
//! `Result`. Operation errors and panics never escape the executor.
//!
//! ```rust,no_run
//! use utilkit::retry::{Retry, RetryOptions};
//!
//! # async fn fetch() -> Result<String, std::io::Error> { Ok(String::new()) }
//! # async fn example() {
//! let retry = Retry::default();
//!
//! match retry.execute(|| fetch()).await {
//!     Ok(body) => println!("Success: {}", body),
//!     Err(e) => eprintln!("Failed after retries: {}", e.message()),
//! }
//!
//! let quick = retry
//!     .execute_with(|| fetch(), RetryOptions::new().max_attempts(2).base_delay_ms(1000))
//!     .await;
//! # drop(quick);
//! # }
//! ```

mod delay;
mod error;
mod policy;


pub use delay::{delay, RecordingSleeper, Sleeper, TokioSleeper};
pub use error::{BoxError, NormalizedError, RetryError};
pub use policy::{RetryOptions, RetryPolicy};

use futures::FutureExt;
use log::{debug, error, warn};
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Executes operations with retry and backoff
///
/// The instance only holds its policy and sleeper, so one executor can serve
/// any number of concurrent calls.
#[derive(Clone)]
pub struct Retry {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("policy", &self.policy)
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::DEFAULT,
            sleeper: Arc::new(TokioSleeper),
        }
    }
}

impl Retry {
    /// Creates an executor from partial options, falling back to the defaults
    pub fn new(options: RetryOptions) -> Result<Self, RetryError> {
        Self::from_policy(options.resolve(&RetryPolicy::DEFAULT))
    }

    /// Creates an executor from a complete policy
    pub fn from_policy(policy: RetryPolicy) -> Result<Self, RetryError> {
        policy.validate()?;
        Ok(Self {
            policy,
            ..Self::default()
        })
    }

    /// Replaces the sleeper used between attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// The policy configured on this instance
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs an asynchronous operation with the instance policy
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.execute_with(operation, RetryOptions::default()).await
    }

    /// Runs an asynchronous operation, overriding parts of the policy for this call
    ///
    /// A panic while creating or polling the operation's future counts as a failed
    /// attempt and is normalized to `"Unknown error"`.
    pub async fn execute_with<F, Fut, T, E>(
        &self,
        mut operation: F,
        overrides: RetryOptions,
    ) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let policy = self.effective_policy(&overrides)?;

        self.run(policy, || {
            let invoked = panic::catch_unwind(AssertUnwindSafe(|| operation()));
            async move {
                match invoked {
                    Ok(future) => match AssertUnwindSafe(future).catch_unwind().await {
                        Ok(result) => result.map_err(NormalizedError::from_error),
                        Err(payload) => Err(NormalizedError::from_panic(payload)),
                    },
                    Err(payload) => Err(NormalizedError::from_panic(payload)),
                }
            }
        })
        .await
    }

    /// Runs a synchronous operation with the instance policy
    pub async fn execute_sync<F, T, E>(&self, operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.execute_sync_with(operation, RetryOptions::default()).await
    }

    /// Runs a synchronous operation, overriding parts of the policy for this call
    pub async fn execute_sync_with<F, T, E>(
        &self,
        mut operation: F,
        overrides: RetryOptions,
    ) -> Result<T, RetryError>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        let policy = self.effective_policy(&overrides)?;

        self.run(policy, || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| operation())) {
                Ok(result) => result.map_err(NormalizedError::from_error),
                Err(payload) => Err(NormalizedError::from_panic(payload)),
            };
            futures::future::ready(outcome)
        })
        .await
    }

    fn effective_policy(&self, overrides: &RetryOptions) -> Result<RetryPolicy, RetryError> {
        let policy = overrides.resolve(&self.policy);
        policy.validate()?;
        Ok(policy)
    }

    async fn run<A, Fut, T>(&self, policy: RetryPolicy, mut attempt_once: A) -> Result<T, RetryError>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NormalizedError>>,
    {
        let mut last_error = None;
        let mut attempts = 0;

        for attempt in 1..=policy.max_attempts {
            attempts = attempt;
            match attempt_once().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Operation succeeded after {} attempts", attempt);
                    }
                    return Ok(value);
                }
                Err(error) => match policy.delay_after(attempt) {
                    Some(wait) => {
                        warn!(
                            "Attempt {} failed: {}. Retrying in {}ms...",
                            attempt,
                            error,
                            wait.as_millis()
                        );
                        last_error = Some(error);
                        self.sleeper.sleep(wait).await;
                    }
                    None => {
                        warn!(
                            "Max attempts ({}) exhausted. Last error: {}",
                            policy.max_attempts, error
                        );
                        last_error = Some(error);
                    }
                },
            }
        }

        match last_error {
            Some(last) => Err(RetryError::Exhausted { attempts, last }),
            None => {
                error!("Retry loop ended without a result or a recorded error");
                Err(RetryError::Internal)
            }
        }
    }
}
