//! Client for the IBPT tax-rate lookup service.
//!
//! Given a product or service code and a state, the service answers with the
//! national, state, imported and municipal tax rates that apply.

pub mod context;
pub mod error;
pub mod http;
pub mod lookup;
pub mod model;

pub use context::Context;
pub use error::{ConfigError, Error, Result, TransportError, ValidationError};
pub use http::{Client, ClientOption, LookupKind};
pub use lookup::TaxLookup;
pub use model::{Request, Response};
