//! Settings for the default reqwest transport

use crate::error::{HttpError, HttpResult};
use std::time::Duration;

/// Client settings applied once when a [`ReqwestTransport`] is built
///
/// [`ReqwestTransport`]: crate::transport::ReqwestTransport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Upper bound for a whole dispatch, connect to last body byte
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Sent as `User-Agent` unless the request sets its own
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the dispatch timeout in seconds; negative, NaN or overflowing
    /// values are rejected
    pub fn timeout_secs(self, secs: f64) -> HttpResult<Self> {
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|e| HttpError::config(format!("timeout {} rejected: {}", secs, e)))?;
        Ok(self.timeout(timeout))
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
