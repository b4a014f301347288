//! Shorthand constructors for common verbs
//!
//! None of these dispatch: call [`RequestBuilder::go`] on the result.
//!
//! The module-level functions use the shared default transport. [`Courier`]
//! offers the same shorthands over an injected transport.

use crate::error::{HttpError, HttpResult};
use crate::method::HttpMethod;
use crate::options::Payload;
use crate::request::RequestBuilder;
use crate::transport::{default_transport, Transport};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Factory for request builders sharing one transport
#[derive(Clone)]
pub struct Courier {
    transport: Arc<dyn Transport>,
}

impl Courier {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Builder with `options` staged
    pub fn make(&self, options: Map<String, Value>) -> RequestBuilder {
        RequestBuilder::make(self.transport.as_ref(), options)
    }

    pub fn get(&self, url: &str, options: Map<String, Value>) -> RequestBuilder {
        self.make(verb_options(url, HttpMethod::Get, options))
    }

    pub fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &T,
        options: Map<String, Value>,
    ) -> HttpResult<RequestBuilder> {
        with_data(self.make(verb_options(url, HttpMethod::Post, options)), data)
    }

    pub fn put<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &T,
        options: Map<String, Value>,
    ) -> HttpResult<RequestBuilder> {
        with_data(self.make(verb_options(url, HttpMethod::Put, options)), data)
    }

    pub fn delete(&self, url: &str, options: Map<String, Value>) -> RequestBuilder {
        self.make(verb_options(url, HttpMethod::Delete, options))
    }
}

impl std::fmt::Debug for Courier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Courier").finish_non_exhaustive()
    }
}

/// Builder on the default transport with `options` staged
pub fn make(options: Map<String, Value>) -> HttpResult<RequestBuilder> {
    Ok(RequestBuilder::make(default_transport()?, options))
}

/// GET `url` on the default transport
pub fn get(url: &str, options: Map<String, Value>) -> HttpResult<RequestBuilder> {
    make(verb_options(url, HttpMethod::Get, options))
}

/// POST `data` to `url` on the default transport
pub fn post<T: Serialize + ?Sized>(
    url: &str,
    data: &T,
    options: Map<String, Value>,
) -> HttpResult<RequestBuilder> {
    with_data(make(verb_options(url, HttpMethod::Post, options))?, data)
}

/// PUT `data` to `url` on the default transport
pub fn put<T: Serialize + ?Sized>(
    url: &str,
    data: &T,
    options: Map<String, Value>,
) -> HttpResult<RequestBuilder> {
    with_data(make(verb_options(url, HttpMethod::Put, options))?, data)
}

/// DELETE `url` on the default transport
pub fn delete(url: &str, options: Map<String, Value>) -> HttpResult<RequestBuilder> {
    make(verb_options(url, HttpMethod::Delete, options))
}

/// Caller options overlaid with the forced url/method/return_transfer entries
fn verb_options(url: &str, method: HttpMethod, mut options: Map<String, Value>) -> Map<String, Value> {
    options.insert("url".to_string(), Value::String(url.to_string()));
    options.insert("method".to_string(), Value::String(method.as_str().to_string()));
    options.insert("return_transfer".to_string(), Value::Bool(true));
    options
}

/// Attach `data` unless it is empty
fn with_data<T: Serialize + ?Sized>(builder: RequestBuilder, data: &T) -> HttpResult<RequestBuilder> {
    let value = serde_json::to_value(data)
        .map_err(|e| HttpError::Json(format!("Failed to serialize payload: {}", e)))?;
    let payload = Payload::try_from(value)?;
    if payload.is_empty() {
        return Ok(builder);
    }
    Ok(builder.set_payload(payload))
}
