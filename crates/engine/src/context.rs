// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-call deadline and cancellation

use crate::ScheduleError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied deadline and cancellation signal for one operation
#[derive(Clone, Debug, Default)]
pub struct OpContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl OpContext {
    /// No deadline, never cancelled
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Apply `default` as the timeout when no deadline was given
    pub(crate) fn or_timeout(&self, default: Option<Duration>) -> OpContext {
        match (self.deadline, default) {
            (None, Some(timeout)) => self.clone().with_timeout(timeout),
            _ => self.clone(),
        }
    }

    /// Fail if the operation was cancelled or its deadline has passed
    pub fn check(&self) -> Result<(), ScheduleError> {
        if self.cancel.is_cancelled() {
            return Err(ScheduleError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ScheduleError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Race `fut` against cancellation and the deadline
    pub async fn run<T, E, F>(&self, fut: F) -> Result<T, ScheduleError>
    where
        F: Future<Output = Result<T, E>>,
        ScheduleError: From<E>,
    {
        let expiry = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ScheduleError::Cancelled),
            _ = expiry => Err(ScheduleError::DeadlineExceeded),
            result = fut => result.map_err(ScheduleError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_passes_results_through() {
        let cx = OpContext::new();
        let value = cx.run(async { Ok::<_, ScheduleError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_at_deadline() {
        let cx = OpContext::new().with_timeout(Duration::from_millis(50));
        let result = cx
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, ScheduleError>(())
            })
            .await;
        assert!(matches!(result, Err(ScheduleError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let token = CancellationToken::new();
        let cx = OpContext::new().with_cancellation(token.clone());
        token.cancel();
        let result = cx.run(async { Ok::<_, ScheduleError>(()) }).await;
        assert!(matches!(result, Err(ScheduleError::Cancelled)));
        assert!(matches!(cx.check(), Err(ScheduleError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn default_timeout_applies_only_without_deadline() {
        let cx = OpContext::new().or_timeout(Some(Duration::from_secs(1)));
        assert!(cx.deadline().is_some());

        let explicit = Instant::now() + Duration::from_secs(60);
        let cx = OpContext::new()
            .with_deadline(explicit)
            .or_timeout(Some(Duration::from_secs(1)));
        assert_eq!(cx.deadline(), Some(explicit));
    }
}
