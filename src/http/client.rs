//! Client for the IBPT lookup endpoints.

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{StatusCode, Url};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::retry::with_retry;
use crate::context::Context;
use crate::error::{ConfigError, Error, Result};
use crate::model::request::mask_token;
use crate::model::{Request, Response};

/// Lookup endpoint for goods (NCM codes).
pub const DEFAULT_ENDPOINT_PRODUCTS: &str = "https://apidoni.ibpt.org.br/api/v1/produtos";

/// Lookup endpoint for services (NBS/LC116 codes).
pub const DEFAULT_ENDPOINT_SERVICES: &str = "https://apidoni.ibpt.org.br/api/v1/servicos";

/// Per-attempt timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which of the two service categories a client queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LookupKind {
    #[default]
    Product,
    Service,
}

impl LookupKind {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LookupKind::Product => DEFAULT_ENDPOINT_PRODUCTS,
            LookupKind::Service => DEFAULT_ENDPOINT_SERVICES,
        }
    }

    /// Single-letter code IBPT uses for the category ("P" or "S").
    pub fn code(self) -> &'static str {
        match self {
            LookupKind::Product => "P",
            LookupKind::Service => "S",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Product => write!(f, "product"),
            LookupKind::Service => write!(f, "service"),
        }
    }
}

impl FromStr for LookupKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "product" | "products" | "p" => Ok(LookupKind::Product),
            "service" | "services" | "s" => Ok(LookupKind::Service),
            _ => Err(ConfigError::UnknownKind(s.to_string())),
        }
    }
}

/// A construction-time setting. Options are applied in order and the first
/// one that fails aborts construction.
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Replace the kind's default endpoint. Must be an absolute http(s) URL.
    Endpoint(String),
    /// Use a preconfigured transport (proxies, TLS roots, connection pool).
    HttpClient(reqwest::Client),
    /// Per-attempt timeout. Must be greater than zero.
    Timeout(Duration),
}

impl ClientOption {
    fn apply(self, client: &mut Client) -> Result<(), ConfigError> {
        match self {
            ClientOption::Endpoint(url) => {
                client.endpoint = parse_endpoint(&url)?;
            }
            ClientOption::HttpClient(http) => {
                client.http = http;
            }
            ClientOption::Timeout(timeout) => {
                if timeout.is_zero() {
                    return Err(ConfigError::InvalidTimeout(timeout));
                }
                client.timeout = timeout;
            }
        }
        Ok(())
    }
}

fn parse_endpoint(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}

/// Sends lookups to the IBPT service.
///
/// Cheap to clone; clones share the underlying connection pool, so one
/// client can serve many concurrent lookups.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    kind: LookupKind,
}

impl Client {
    /// Creates a client for `kind`, applying `options` in order.
    pub fn new<I>(kind: LookupKind, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        let mut client = Self {
            http: reqwest::Client::new(),
            endpoint: kind.default_endpoint().to_string(),
            timeout: DEFAULT_TIMEOUT,
            kind,
        };

        for option in options {
            option.apply(&mut client)?;
        }

        debug!(
            "Created {} ({}) client for {} (timeout {:?})",
            client.kind,
            client.kind.code(),
            client.endpoint,
            client.timeout
        );
        Ok(client)
    }

    /// Creates a client for the products endpoint.
    pub fn product<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        Self::new(LookupKind::Product, options)
    }

    /// Creates a client for the services endpoint.
    pub fn service<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        Self::new(LookupKind::Service, options)
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a lookup without retrying, bounded by the configured timeout.
    pub async fn send(&self, request: &Request) -> Result<Response> {
        let ctx = Context::background().with_timeout(self.timeout);
        self.send_with_context(&ctx, request).await
    }

    /// Sends a lookup without retrying, bounded by `ctx`.
    ///
    /// Any status other than 200 is an error.
    #[tracing::instrument(skip(self, ctx, request), fields(kind = %self.kind, code = %request.code))]
    pub async fn send_with_context(&self, ctx: &Context, request: &Request) -> Result<Response> {
        request.validate()?;
        self.dispatch(ctx, request).await
    }

    /// Sends a lookup, retrying up to `attempts` times on any failure.
    pub async fn send_with_retry(&self, request: &Request, attempts: usize) -> Result<Response> {
        self.send_with_retry_with_context(&Context::background(), request, attempts)
            .await
    }

    /// Sends a lookup, retrying up to `attempts` times on any failure.
    ///
    /// Every attempt gets its own deadline of the configured timeout, capped
    /// by `ctx`. Validation errors are returned before the first attempt.
    #[tracing::instrument(skip(self, ctx, request), fields(kind = %self.kind, code = %request.code))]
    pub async fn send_with_retry_with_context(
        &self,
        ctx: &Context,
        request: &Request,
        attempts: usize,
    ) -> Result<Response> {
        request.validate()?;

        with_retry("IBPT lookup", ctx, attempts, |_| async move {
            let attempt_ctx = ctx.with_timeout(self.timeout);
            self.dispatch(&attempt_ctx, request).await
        })
        .await
    }

    async fn dispatch(&self, ctx: &Context, request: &Request) -> Result<Response> {
        ctx.run(self.execute(request)).await?
    }

    async fn execute(&self, request: &Request) -> Result<Response> {
        debug!(
            "GET {} code={} uf={} token={}",
            self.endpoint,
            request.code,
            request.uf,
            mask_token(&request.token)
        );

        let response = self
            .http
            .get(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Server {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Response::from_slice(&body)
    }
}
