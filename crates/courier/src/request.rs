//! Fluent builder for a single HTTP request
//!
//! A [`RequestBuilder`] owns one transport handle from construction until
//! [`go`](RequestBuilder::go) consumes it. Settings are staged either through
//! the typed setters or in bulk through [`set_options`](RequestBuilder::set_options);
//! bulk options are applied by [`fetch_options`](RequestBuilder::fetch_options)
//! at dispatch time.

use crate::content::{self, DataType, DEFAULT_CONTENT};
use crate::error::{HttpError, HttpResult};
use crate::method::HttpMethod;
use crate::options::{header_value, HeaderInput, OptionKey, Payload};
use crate::query::{append_query, build_query};
use crate::transport::{default_transport, Transport, TransportHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Prefix stored in the output when the transport fails
pub const ERROR_PREFIX: &str = "Error: ";

const HEADER: &str = "header";
const URL: &str = "url";
const RETURN_TRANSFER: &str = "return_transfer";
const DEFAULT_DATA_TYPE: &str = "query";

/// Configuration and result of one HTTP request
///
/// # Example
///
/// ```ignore
/// use courier::{RequestBuilder, ReqwestTransport, HttpClientConfig};
///
/// let transport = ReqwestTransport::new(HttpClientConfig::default())?;
/// let request = RequestBuilder::new(&transport)
///     .set_url("https://api.example.com/users")
///     .set_method("post")?
///     .set_header("Authorization: Bearer abc")?
///     .set_data(&serde_json::json!({"name": "Alice"}))?
///     .go()?;
///
/// println!("{}", request.output().unwrap_or_default());
/// ```
pub struct RequestBuilder {
    handle: Option<Box<dyn TransportHandle>>,
    options: Map<String, Value>,
    method: Option<String>,
    content: String,
    data_type: String,
    data: Payload,
    output: Option<String>,
}

impl RequestBuilder {
    /// Create a builder holding a fresh handle from `transport`
    pub fn new(transport: &dyn Transport) -> Self {
        let mut options = Map::new();
        options.insert(HEADER.to_string(), Value::Object(Map::new()));
        options.insert(RETURN_TRANSFER.to_string(), Value::Bool(true));

        Self {
            handle: Some(transport.open()),
            options,
            method: None,
            content: DEFAULT_CONTENT.to_string(),
            data_type: DEFAULT_DATA_TYPE.to_string(),
            data: Payload::default(),
            output: None,
        }
    }

    /// Create a builder on the shared default transport
    pub fn with_default_transport() -> HttpResult<Self> {
        Ok(Self::new(default_transport()?))
    }

    /// Create a builder and stage `options` on it
    pub fn make<I, K>(transport: &dyn Transport, options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::new(transport).set_options(options)
    }

    // ------------------------------------------------------------------
    // Bulk options
    // ------------------------------------------------------------------

    /// Shallow-merge entries into the options map, overwriting same-named keys
    pub fn set_options<I, K>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in options {
            self.options.insert(key.into(), value);
        }
        self
    }

    /// Apply every staged option through its setter
    ///
    /// Fails with [`HttpError::UnknownOption`] on a key outside the option
    /// table and with [`HttpError::InvalidConfig`] when a setter rejects the value.
    pub fn fetch_options(mut self) -> HttpResult<Self> {
        let staged: Vec<(String, Value)> = self
            .options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, value) in staged {
            let option = OptionKey::from_key(&key).ok_or(HttpError::UnknownOption(key))?;
            self = self.apply_option(option, value)?;
        }
        Ok(self)
    }

    fn apply_option(self, option: OptionKey, value: Value) -> HttpResult<Self> {
        match option {
            OptionKey::Header => self.set_header(HeaderInput::from_value(value)?),
            OptionKey::Url => Ok(self.set_url(expect_str(option, value)?)),
            OptionKey::Method => self.set_method(&expect_str(option, value)?),
            OptionKey::ReturnTransfer => match value {
                Value::Bool(enabled) => Ok(self.set_return_transfer(enabled)),
                other => Err(type_mismatch(option, "a boolean", &other)),
            },
            OptionKey::Content => self.set_content(&expect_str(option, value)?),
            OptionKey::Data => Ok(self.set_payload(Payload::try_from(value)?)),
        }
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Merge headers into the request headers
    ///
    /// Accepts name/value collections or a single `"Name: Value"` line.
    pub fn set_header(mut self, headers: impl Into<HeaderInput>) -> HttpResult<Self> {
        let entries = headers.into().into_entries()?;

        let slot = self
            .options
            .entry(HEADER)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            for (name, value) in entries {
                map.insert(name, Value::String(value));
            }
        }
        Ok(self)
    }

    /// Set the request URL (stored verbatim)
    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.options.insert(URL.to_string(), Value::String(url.into()));
        self
    }

    /// Set the request method; only GET, POST, PUT and DELETE are accepted (any case)
    pub fn set_method(mut self, method: &str) -> HttpResult<Self> {
        method.parse::<HttpMethod>()?;
        self.method = Some(method.to_string());
        Ok(self)
    }

    /// Set the payload from any value serializing to a map, a list or null
    pub fn set_data<T: Serialize + ?Sized>(self, data: &T) -> HttpResult<Self> {
        let value = serde_json::to_value(data)
            .map_err(|e| HttpError::Json(format!("Failed to serialize payload: {}", e)))?;
        Ok(self.set_payload(Payload::try_from(value)?))
    }

    /// Set an already-built payload
    pub fn set_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.data = payload.into();
        self
    }

    /// Choose how the payload is attached: `"json"` or `"query"` (any case)
    ///
    /// A content type carrying its own encoding overrides this at dispatch.
    pub fn set_data_type(mut self, data_type: &str) -> HttpResult<Self> {
        data_type.parse::<DataType>()?;
        self.data_type = data_type.to_string();
        Ok(self)
    }

    /// Capture the response body into the output (`true`, the default) or
    /// let the transport emit it
    pub fn set_return_transfer(mut self, enabled: bool) -> Self {
        self.options
            .insert(RETURN_TRANSFER.to_string(), Value::Bool(enabled));
        self
    }

    /// Select a content tag from the content-type table
    pub fn set_content(mut self, tag: &str) -> HttpResult<Self> {
        content::resolve(tag)?;
        self.content = tag.to_string();
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Resolve the configuration, execute the request and release the handle
    ///
    /// Configuration errors are returned before any network activity. A
    /// transport failure is not an error: the output becomes
    /// `"Error: <reason>"`.
    pub fn go(self) -> HttpResult<Self> {
        if self.handle.is_none() {
            return Err(HttpError::AlreadyDispatched);
        }

        let mut this = self.fetch_options()?.make_content()?;
        let (url, body) = this.encode_payload()?;
        let method = this.resolved_method()?;
        let headers: Vec<(String, String)> = this.headers().into_iter().collect();
        let return_transfer = this.return_transfer();

        let mut handle = this.handle.take().ok_or(HttpError::AlreadyDispatched)?;
        handle.set_url(&url);
        handle.set_method(method);
        handle.set_return_transfer(return_transfer);
        handle.set_headers(&headers);
        if let Some(body) = body {
            handle.set_body(body);
        }

        debug!(method = %method, url = %url, data_type = %this.data_type, "dispatching request");

        this.output = Some(match handle.execute() {
            Some(body) if !body.is_empty() => body,
            _ => {
                let reason = handle.error_text();
                warn!(method = %method, url = %url, error = %reason, "request failed");
                format!("{}{}", ERROR_PREFIX, reason)
            }
        });

        drop(handle);
        Ok(this)
    }

    /// Apply the content-type table: set the `Content-Type` header and force
    /// the table's payload encoding
    fn make_content(self) -> HttpResult<Self> {
        let entry = content::resolve(&self.content)?;
        let mut this = self.set_header([("Content-Type", entry.mime)])?;
        if let Some(data_type) = entry.data_type {
            this = this.set_data_type(data_type.as_str())?;
        }
        Ok(this)
    }

    /// Final URL and optional body for the current data type
    fn encode_payload(&self) -> HttpResult<(String, Option<String>)> {
        let url = self.url().unwrap_or_default().to_string();

        match self.data_type.parse::<DataType>()? {
            DataType::Query => {
                let query = build_query(&self.data);
                Ok((append_query(&url, &query), None))
            }
            DataType::Json => {
                if self.data.is_empty() {
                    return Ok((url, None));
                }
                let body = serde_json::to_string(&self.data.to_json())
                    .map_err(|e| HttpError::Json(format!("Failed to serialize payload: {}", e)))?;
                Ok((url, Some(body)))
            }
        }
    }

    fn resolved_method(&self) -> HttpResult<HttpMethod> {
        match self.method.as_deref() {
            Some(method) => method.parse(),
            None => Ok(HttpMethod::Get),
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Raw response body, or `"Error: ..."` after a transport failure.
    /// `None` before dispatch.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Whether the output records a transport failure
    pub fn is_error(&self) -> bool {
        self.output
            .as_deref()
            .is_some_and(|out| out.starts_with(ERROR_PREFIX))
    }

    /// Decode the output as JSON
    pub fn output_json(&self) -> HttpResult<Value> {
        self.output_as()
    }

    /// Decode the output as JSON into `T`
    pub fn output_as<T: DeserializeOwned>(&self) -> HttpResult<T> {
        let out = self
            .output
            .as_deref()
            .ok_or_else(|| HttpError::Json("no output: request not dispatched".to_string()))?;
        serde_json::from_str(out)
            .map_err(|e| HttpError::Json(format!("Failed to parse JSON: {}", e)))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Staged options map
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn url(&self) -> Option<&str> {
        self.options.get(URL).and_then(Value::as_str)
    }

    /// Method as given to `set_method`
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Current request headers
    pub fn headers(&self) -> BTreeMap<String, String> {
        match self.options.get(HEADER) {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), header_value(v.clone())))
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    pub fn return_transfer(&self) -> bool {
        self.options
            .get(RETURN_TRANSFER)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Payload encoding as given to `set_data_type`
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// Whether `go` has consumed the transport handle
    pub fn is_dispatched(&self) -> bool {
        self.handle.is_none()
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("options", &self.options)
            .field("method", &self.method)
            .field("content", &self.content)
            .field("data_type", &self.data_type)
            .field("dispatched", &self.is_dispatched())
            .finish()
    }
}

fn expect_str(option: OptionKey, value: Value) -> HttpResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(type_mismatch(option, "a string", &other)),
    }
}

fn type_mismatch(option: OptionKey, expected: &str, got: &Value) -> HttpError {
    HttpError::config(format!(
        "option {} expects {}, got {}",
        option.as_str(),
        expected,
        got
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Settings a handle received, shared with the test after the handle is dropped
    #[derive(Debug, Default, Clone)]
    struct Seen {
        url: Option<String>,
        method: Option<HttpMethod>,
        headers: Vec<(String, String)>,
        body: Option<String>,
    }

    struct StubTransport {
        seen: Arc<Mutex<Seen>>,
    }

    struct StubHandle {
        seen: Arc<Mutex<Seen>>,
    }

    impl Transport for StubTransport {
        fn open(&self) -> Box<dyn TransportHandle> {
            Box::new(StubHandle { seen: self.seen.clone() })
        }
    }

    impl TransportHandle for StubHandle {
        fn set_url(&mut self, url: &str) {
            self.seen.lock().unwrap().url = Some(url.to_string());
        }
        fn set_method(&mut self, method: HttpMethod) {
            self.seen.lock().unwrap().method = Some(method);
        }
        fn set_headers(&mut self, headers: &[(String, String)]) {
            self.seen.lock().unwrap().headers = headers.to_vec();
        }
        fn set_return_transfer(&mut self, _enabled: bool) {}
        fn set_body(&mut self, body: String) {
            self.seen.lock().unwrap().body = Some(body);
        }
        fn execute(&mut self) -> Option<String> {
            Some("ok".to_string())
        }
        fn error_text(&self) -> String {
            String::new()
        }
    }

    fn stub() -> (StubTransport, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        (StubTransport { seen: seen.clone() }, seen)
    }

    #[test]
    fn test_defaults() {
        let (transport, _) = stub();
        let request = RequestBuilder::new(&transport);
        assert_eq!(request.content(), "json");
        assert_eq!(request.data_type(), "query");
        assert!(request.return_transfer());
        assert!(request.headers().is_empty());
        assert_eq!(request.output(), None);
        assert!(!request.is_dispatched());
    }

    #[test]
    fn test_query_encoding_appends_to_url() {
        let (transport, seen) = stub();
        let request = RequestBuilder::new(&transport)
            .set_url("http://x")
            .set_data(&json!({"a": "1", "b": "2"}))
            .unwrap()
            .set_data_type("query")
            .unwrap();

        let (url, body) = request.encode_payload().unwrap();
        assert_eq!(url, "http://x?a=1&b=2");
        assert_eq!(body, None);
        assert!(seen.lock().unwrap().url.is_none());
    }

    #[test]
    fn test_json_encoding_sets_body() {
        let (transport, _) = stub();
        let request = RequestBuilder::new(&transport)
            .set_url("http://x")
            .set_data(&json!({"a": 1}))
            .unwrap()
            .set_data_type("JSON")
            .unwrap();

        let (url, body) = request.encode_payload().unwrap();
        assert_eq!(url, "http://x");
        assert_eq!(body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_make_content_forces_json() {
        let (transport, _) = stub();
        let request = RequestBuilder::new(&transport)
            .set_data_type("query")
            .unwrap()
            .make_content()
            .unwrap();

        assert_eq!(request.data_type(), "json");
        assert_eq!(
            request.headers().get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_unset_method_dispatches_get() {
        let (transport, seen) = stub();
        RequestBuilder::new(&transport).set_url("http://x").go().unwrap();
        assert_eq!(seen.lock().unwrap().method, Some(HttpMethod::Get));
    }

    #[test]
    fn test_wrong_option_type_rejected() {
        let (transport, _) = stub();
        let err = RequestBuilder::new(&transport)
            .set_options([("return_transfer", json!("yes"))])
            .fetch_options()
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidConfig(_)));
    }

    #[test]
    fn test_output_before_dispatch() {
        let (transport, _) = stub();
        let request = RequestBuilder::new(&transport);
        assert!(matches!(request.output_json(), Err(HttpError::Json(_))));
        assert!(!request.is_error());
    }
}
