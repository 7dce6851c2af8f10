//! Request pipeline stage: one attempt, one retry after a fixed delay, then
//! classification, a single error notification and a log line.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::errors::{ApiError, RequestFailure};
use crate::notifications::NotificationQueue;

/// Extra attempts after the first failure.
pub const MAX_RETRIES: u32 = 1;

#[derive(Clone)]
pub struct ErrorInterceptor {
    retry_delay: Duration,
    notifications: NotificationQueue,
}

impl ErrorInterceptor {
    pub fn new(retry_delay: Duration, notifications: NotificationQueue) -> Self {
        Self {
            retry_delay,
            notifications,
        }
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Runs `attempt`, retrying once on any failure.
    ///
    /// The terminal failure is the last attempt's failure; its class message is
    /// pushed to the notification queue before the translated error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut attempt: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RequestFailure>>,
    {
        let mut failure = match attempt().await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        for retry in 1..=MAX_RETRIES {
            warn!(
                "{label} failed ({failure}), retry {retry}/{MAX_RETRIES} in {}ms",
                self.retry_delay.as_millis()
            );
            tokio::time::sleep(self.retry_delay).await;

            failure = match attempt().await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };
        }

        let class = failure.class();
        error!(
            status = failure.status(),
            class = ?class,
            "{label} failed after {MAX_RETRIES} retry: {failure}"
        );
        self.notifications.error(class.message());

        Err(ApiError::from(failure))
    }
}
