//! Bounded retry loop for lookups.
//!
//! Every failed attempt is retried regardless of its class: transport
//! failures, any non-200 status (4xx included) and undecodable bodies.
//! Attempts run back-to-back without backoff.

use log::{debug, error, warn};

use crate::context::Context;
use crate::error::Result;

/// Runs `operation` up to `attempts` times, returning the first success or
/// the last error. An `attempts` of zero still runs once.
///
/// The loop stops early once `parent` is cancelled or past its deadline.
pub(crate) async fn with_retry<F, Fut, T>(
    operation_name: &str,
    parent: &Context,
    attempts: usize,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(usize) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => {
                debug!("{}: succeeded on attempt {}/{}", operation_name, attempt, attempts);
                return Ok(result);
            }
            Err(e) => {
                if attempt >= attempts {
                    error!(
                        "{}: giving up after {} attempts ({})",
                        operation_name, attempts, e
                    );
                    return Err(e);
                }

                if let Some(reason) = parent.err() {
                    debug!(
                        "{}: parent context done ({}), not retrying",
                        operation_name, reason
                    );
                    return Err(e);
                }

                warn!(
                    "{}: attempt {}/{} failed ({}), retrying...",
                    operation_name, attempt, attempts, e
                );
                attempt += 1;
            }
        }
    }
}
