//! courier: fluent single-request HTTP builder
//!
//! Configures one HTTP request through chainable setters, validates it, and
//! executes it once over a pluggable blocking transport.
//!
//! # Architecture
//!
//! - `RequestBuilder`: staged options, typed setters, dispatch and output
//! - `Transport` / `TransportHandle`: the seam to the HTTP client; the
//!   default `ReqwestTransport` wraps `reqwest::blocking`
//! - `factory`: `make`/`get`/`post`/`put`/`delete` shorthands, plus `Courier`
//!   for the same shorthands over an injected transport
//!
//! Transport failures never surface as `Err`: the builder output becomes
//! `"Error: <reason>"`. Configuration errors are returned before any network
//! activity.

pub mod config;
pub mod content;
pub mod error;
pub mod factory;
pub mod method;
pub mod options;
pub mod query;
pub mod request;
pub mod transport;

pub use config::HttpClientConfig;
pub use content::{ContentType, DataType};
pub use error::{HttpError, HttpErrorCategory, HttpResult};
pub use factory::{delete, get, make, post, put, Courier};
pub use method::HttpMethod;
pub use options::{HeaderInput, OptionKey, Payload};
pub use request::{RequestBuilder, ERROR_PREFIX};
pub use transport::{default_transport, ReqwestTransport, Transport, TransportHandle};
