//! HTTP transport for IBPT lookups with bounded retry.

mod client;
mod retry;

pub use client::{
    Client, ClientOption, DEFAULT_ENDPOINT_PRODUCTS, DEFAULT_ENDPOINT_SERVICES, DEFAULT_TIMEOUT,
    LookupKind,
};
