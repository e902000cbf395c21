//! Cancellable, deadline-bounded handle passed through the send pipeline.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

/// A cancellation handle with an optional deadline.
///
/// Children created with [`Context::with_timeout`] observe the parent's
/// cancellation and never outlive the parent's deadline. Cancelling a child
/// leaves the parent untouched.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Wraps an existing token, e.g. one shared with a shutdown handler.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derives a child context whose deadline is `timeout` from now, or the
    /// parent's deadline if that comes first.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// Derives a child context bounded by `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<TransportError> {
        if self.token.is_cancelled() {
            return Some(TransportError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TransportError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> TransportError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = self.token.cancelled() => TransportError::Cancelled,
                () = tokio::time::sleep_until(deadline) => TransportError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                TransportError::Cancelled
            }
        }
    }

    /// Runs `fut` until it completes or the context is done, whichever is first.
    ///
    /// A context that is already done never polls `fut`.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, TransportError>
    where
        F: std::future::Future<Output = T>,
    {
        if let Some(reason) = self.err() {
            return Err(reason);
        }
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            value = fut => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_is_live() {
        let ctx = Context::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_propagates_to_child() {
        let parent = Context::background();
        let child = parent.with_timeout(Duration::from_secs(30));
        parent.cancel();
        assert!(child.is_cancelled());
        assert!(matches!(child.err(), Some(TransportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_child_leaves_parent() {
        let parent = Context::background();
        let child = parent.with_timeout(Duration::from_secs(30));
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_child_deadline_capped_by_parent() {
        let parent = Context::background().with_timeout(Duration::from_millis(50));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let shorter = parent.with_timeout(Duration::from_millis(1));
        assert!(shorter.deadline() < parent.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = Context::background().with_timeout(Duration::from_millis(100));
        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert!(matches!(result, Err(TransportError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = Context::background().with_timeout(Duration::from_secs(5));
        let result = ctx.run(async { 7 }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_run_on_cancelled_context_never_polls() {
        let ctx = Context::background();
        ctx.cancel();
        let polled = std::sync::atomic::AtomicBool::new(false);
        let result = ctx
            .run(async {
                polled.store(true, std::sync::atomic::Ordering::SeqCst);
            })
            .await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_future() {
        let ctx = Context::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        let result = ctx.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
    }
}
