//! Transport seam: per-request handles over an underlying HTTP client
//!
//! A [`Transport`] hands out one [`TransportHandle`] per request builder.
//! The builder pushes its resolved settings onto the handle, executes it once
//! and drops it. Dropping a handle releases it.

use crate::config::HttpClientConfig;
use crate::error::{sanitize_error_message, HttpResult};
use crate::method::HttpMethod;
use std::io::Write;
use std::sync::OnceLock;
use tracing::debug;

/// Source of transport handles
pub trait Transport: Send + Sync {
    /// Initialize a fresh handle for a single request.
    fn open(&self) -> Box<dyn TransportHandle>;
}

/// A single-use request handle
pub trait TransportHandle: Send {
    fn set_url(&mut self, url: &str);

    fn set_method(&mut self, method: HttpMethod);

    /// Replace the request headers.
    fn set_headers(&mut self, headers: &[(String, String)]);

    /// Capture the response body (`true`) or write it to stdout (`false`).
    fn set_return_transfer(&mut self, enabled: bool);

    fn set_body(&mut self, body: String);

    /// Perform the request. `None` means the transport failed; the reason is
    /// available from [`error_text`](TransportHandle::error_text).
    fn execute(&mut self) -> Option<String>;

    /// Text describing the last failure, empty when there was none.
    fn error_text(&self) -> String;
}

/// Transport backed by a blocking reqwest client
///
/// The client is built once; every handle shares its connection settings.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    config: HttpClientConfig,
}

impl ReqwestTransport {
    /// Build the shared blocking client from `config`
    pub fn new(config: HttpClientConfig) -> HttpResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("timeout", &self.config.timeout)
            .field("user_agent", &self.config.user_agent)
            .finish()
    }
}

impl Transport for ReqwestTransport {
    fn open(&self) -> Box<dyn TransportHandle> {
        Box::new(ReqwestHandle {
            client: self.client.clone(),
            url: None,
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            return_transfer: true,
            last_error: String::new(),
        })
    }
}

/// Process-wide transport with default configuration, built on first use.
pub fn default_transport() -> HttpResult<&'static ReqwestTransport> {
    static DEFAULT: OnceLock<ReqwestTransport> = OnceLock::new();

    if let Some(transport) = DEFAULT.get() {
        return Ok(transport);
    }
    let transport = ReqwestTransport::new(HttpClientConfig::default())?;
    Ok(DEFAULT.get_or_init(|| transport))
}

struct ReqwestHandle {
    client: reqwest::blocking::Client,
    url: Option<String>,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
    return_transfer: bool,
    last_error: String,
}

impl ReqwestHandle {
    fn fail(&mut self, msg: &str) -> Option<String> {
        self.last_error = sanitize_error_message(msg);
        None
    }
}

impl TransportHandle for ReqwestHandle {
    fn set_url(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }

    fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    fn set_headers(&mut self, headers: &[(String, String)]) {
        self.headers = headers.to_vec();
    }

    fn set_return_transfer(&mut self, enabled: bool) {
        self.return_transfer = enabled;
    }

    fn set_body(&mut self, body: String) {
        self.body = Some(body);
    }

    fn execute(&mut self) -> Option<String> {
        let Some(url) = self.url.clone() else {
            return self.fail("No URL set!");
        };

        let mut request = self.client.request(self.method.into(), url.as_str());
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = self.body.take() {
            request = request.body(body);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => return self.fail(&e.to_string()),
        };
        debug!(status = response.status().as_u16(), url = %url, "response received");

        let text = match response.text() {
            Ok(text) => text,
            Err(e) => return self.fail(&e.to_string()),
        };

        if self.return_transfer {
            return Some(text);
        }

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            return self.fail(&e.to_string());
        }
        Some("1".to_string())
    }

    fn error_text(&self) -> String {
        self.last_error.clone()
    }
}
