//! Per-request execution context
//!
//! Every runtime call made during an extraction is driven through
//! [`ExtractContext::run`], which races the call against the caller's
//! cancellation signal and the configured per-call timeout.

use crate::runtime::RuntimeError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Default)]
pub struct ExtractContext {
    timeout: Option<Duration>,
    cancel: Option<watch::Receiver<bool>>,
}

impl ExtractContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation signal; sending `true` aborts in-flight calls.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    pub async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T, RuntimeError>
    where
        F: Future<Output = Result<T, RuntimeError>>,
    {
        if self.is_cancelled() {
            return Err(RuntimeError::Cancelled { operation });
        }

        let cancelled = async {
            match self.cancel.clone() {
                Some(mut rx) => {
                    // A dropped sender can never cancel, so wait forever in that case.
                    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        let deadline = async {
            match self.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = call => result,
            _ = cancelled => Err(RuntimeError::Cancelled { operation }),
            _ = deadline => Err(RuntimeError::Timeout {
                operation,
                timeout: self.timeout.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let ctx = ExtractContext::new();
        let value = ctx.run("noop", async { Ok::<_, RuntimeError>(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let ctx = ExtractContext::new().with_timeout(Duration::from_millis(10));
        let result = ctx
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, RuntimeError>(())
            })
            .await;
        assert!(matches!(result, Err(RuntimeError::Timeout { operation: "slow", .. })));
    }

    #[tokio::test]
    async fn test_run_is_cancelled_in_flight() {
        let (tx, rx) = watch::channel(false);
        let ctx = ExtractContext::new().with_cancellation(rx);

        let call = ctx.run("slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, RuntimeError>(())
        });
        let cancel = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            tx.send(true).unwrap();
        };

        let (result, _) = tokio::join!(call, cancel);
        assert!(matches!(result, Err(RuntimeError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_run_refuses_when_already_cancelled() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let ctx = ExtractContext::new().with_cancellation(rx);

        let result = ctx.run("inspect", async { Ok::<_, RuntimeError>(()) }).await;
        assert!(matches!(result, Err(RuntimeError::Cancelled { operation: "inspect" })));
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_cancel() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = ExtractContext::new().with_cancellation(rx);

        let result = ctx.run("inspect", async { Ok::<_, RuntimeError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
