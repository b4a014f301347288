//! Recording transport shared by the integration tests

#![allow(dead_code)]

use courier::{HttpMethod, Transport, TransportHandle};
use std::sync::{Arc, Mutex};

/// What a handle was told before it was released
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub return_transfer: Option<bool>,
    pub executions: usize,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Canned transport result
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Fail(String),
}

/// Transport whose handles push their recorded settings into a shared log when dropped
pub struct RecordingTransport {
    reply: Reply,
    released: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingTransport {
    pub fn replying(body: &str) -> Self {
        Self {
            reply: Reply::Body(body.to_string()),
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Reply::Fail(reason.to_string()),
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the log of released handles
    pub fn log(&self) -> Arc<Mutex<Vec<Recorded>>> {
        self.released.clone()
    }
}

impl Transport for RecordingTransport {
    fn open(&self) -> Box<dyn TransportHandle> {
        Box::new(RecordingHandle {
            reply: self.reply.clone(),
            recorded: Recorded::default(),
            released: self.released.clone(),
            last_error: String::new(),
        })
    }
}

struct RecordingHandle {
    reply: Reply,
    recorded: Recorded,
    released: Arc<Mutex<Vec<Recorded>>>,
    last_error: String,
}

impl TransportHandle for RecordingHandle {
    fn set_url(&mut self, url: &str) {
        self.recorded.url = Some(url.to_string());
    }

    fn set_method(&mut self, method: HttpMethod) {
        self.recorded.method = Some(method);
    }

    fn set_headers(&mut self, headers: &[(String, String)]) {
        self.recorded.headers = headers.to_vec();
    }

    fn set_return_transfer(&mut self, enabled: bool) {
        self.recorded.return_transfer = Some(enabled);
    }

    fn set_body(&mut self, body: String) {
        self.recorded.body = Some(body);
    }

    fn execute(&mut self) -> Option<String> {
        self.recorded.executions += 1;
        match &self.reply {
            Reply::Body(body) => Some(body.clone()),
            Reply::Fail(reason) => {
                self.last_error = reason.clone();
                None
            }
        }
    }

    fn error_text(&self) -> String {
        self.last_error.clone()
    }
}

impl Drop for RecordingHandle {
    fn drop(&mut self) {
        if let Ok(mut released) = self.released.lock() {
            released.push(self.recorded.clone());
        }
    }
}
