//! Abstraction over the lookup service so callers can swap in test doubles.

use async_trait::async_trait;
use log::info;

use crate::context::Context;
use crate::error::Result;
use crate::http::{Client, LookupKind};
use crate::model::{Request, Response};

/// Something that can resolve a [`Request`] into tax rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxLookup: Send + Sync {
    /// Get the lookup kind.
    fn kind(&self) -> LookupKind;

    /// Get the endpoint URL.
    fn endpoint(&self) -> &str;

    /// Perform one lookup bounded by `ctx`.
    async fn lookup(&self, ctx: &Context, request: &Request) -> Result<Response>;

    /// Perform a lookup with up to `attempts` tries.
    async fn lookup_with_retry(
        &self,
        ctx: &Context,
        request: &Request,
        attempts: usize,
    ) -> Result<Response>;
}

#[async_trait]
impl TaxLookup for Client {
    fn kind(&self) -> LookupKind {
        Client::kind(self)
    }

    fn endpoint(&self) -> &str {
        Client::endpoint(self)
    }

    async fn lookup(&self, ctx: &Context, request: &Request) -> Result<Response> {
        self.send_with_context(ctx, request).await
    }

    async fn lookup_with_retry(
        &self,
        ctx: &Context,
        request: &Request,
        attempts: usize,
    ) -> Result<Response> {
        self.send_with_retry_with_context(ctx, request, attempts)
            .await
    }
}

/// Resolves `request` with up to `attempts` tries.
///
/// Even a single try goes through [`TaxLookup::lookup_with_retry`] so it is
/// bounded by the client's per-attempt timeout, not only by `ctx`.
pub async fn resolve(
    lookup: &dyn TaxLookup,
    ctx: &Context,
    request: &Request,
    attempts: usize,
) -> Result<Response> {
    info!(
        "Looking up {} {} ({}) at {}",
        lookup.kind(),
        request.code,
        request.uf,
        lookup.endpoint()
    );

    lookup
        .lookup_with_retry(ctx, request, attempts.max(1))
        .await
}
