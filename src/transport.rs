//! Transport layer
//!
//! A thin wrapper over the HTTP client. It fixes the base URL, timeout and
//! cookie handling, and forwards everything else untouched. Status codes are
//! not interpreted here; any completed exchange (2xx through 5xx) comes back
//! as a [`TransportResponse`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_reqwest().as_str())
    }
}

/// One outbound request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Relative path (joined to the base URL) or absolute URL
    pub url: String,
    pub body: Option<Value>,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    /// Overrides the transport's default timeout
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            timeout: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, url)
            .with_body(body)
            .with_header("Content-Type", "application/json")
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Raw response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Response carrying `value` serialized as JSON
    pub fn json(status: u16, value: &Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response
            .headers
            .insert("content-type".into(), "application/json".into());
        response
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any response envelope
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{message}")]
    Network { message: String, timed_out: bool },

    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let base_url = parse_base(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .cookie_store(config.with_credentials)
            .build()
            .map_err(|e| TransportError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                timed_out: false,
            })?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URLs pass through; relative paths are appended to the base path.
    pub fn resolve(&self, target: &str) -> Result<Url, TransportError> {
        if let Ok(url) = Url::parse(target) {
            return Ok(url);
        }

        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            target.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| TransportError::InvalidUrl {
            url: target.to_string(),
            reason: e.to_string(),
        })
    }
}

fn parse_base(raw: &str) -> Result<Url, TransportError> {
    Url::parse(raw).map_err(|e| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

fn network_error(err: reqwest::Error) -> TransportError {
    let timed_out = err.is_timeout();
    let message = if timed_out {
        format!("Request timed out: {}", err)
    } else if err.is_connect() {
        format!("Could not connect to server: {}", err)
    } else {
        format!("No response received from server: {}", err)
    };
    TransportError::Network { message, timed_out }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.resolve(&request.url)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), url)
            .timeout(request.timeout.unwrap_or(self.timeout));

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Losing the connection mid-body still means no usable envelope.
        let body = response.bytes().await.map_err(network_error)?.to_vec();

        debug!(status, bytes = body.len(), "response received");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_resolve_relative_keeps_base_path() {
        let t = transport("https://news.example.com/api");
        assert_eq!(
            t.resolve("/translate").unwrap().as_str(),
            "https://news.example.com/api/translate"
        );
        assert_eq!(
            t.resolve("fetch-news").unwrap().as_str(),
            "https://news.example.com/api/fetch-news"
        );
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let t = transport("https://news.example.com/api");
        assert_eq!(
            t.resolve("http://other.example.org/x").unwrap().as_str(),
            "http://other.example.org/x"
        );
    }

    #[test]
    fn test_post_json_sets_content_type() {
        let req = TransportRequest::post_json("/summarizer", serde_json::json!({"topic": "AI"}));
        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 on loopback is reserved (discard) and not listening in test environments.
        let t = HttpTransport::new(&ClientConfig::new("http://127.0.0.1:9").with_timeout_secs(2)).unwrap();
        let err = t
            .send(TransportRequest::new(Method::Post, "/fact-check"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network { .. }));
    }
}
