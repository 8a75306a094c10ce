//! HTTP Client Abstraction
//!
//! Used by the bootstrapper to retrieve the module binary, and home of the
//! request configuration forwarded to the module's network entry point.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Bodiless HTTP request, as the bootstrapper issues them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Configuration object handed to the module's network-request entry point.
///
/// Mirrors the JavaScript shape `{ method, headers, body }`. `body` may be a
/// JSON string or any JSON value; the module serializes objects itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns a copy of this config whose method is replaced by `method`,
    /// whatever the caller set.
    pub fn with_forced_method(&self, method: HttpMethod) -> Self {
        Self {
            method: Some(method),
            ..self.clone()
        }
    }
}

/// Async HTTP client trait
///
/// Futures are `?Send`: the bridge runs on a single-threaded event loop and
/// browser implementations hold `JsValue`s.
#[async_trait(?Send)]
pub trait HttpClient {
    /// Execute an HTTP request
    ///
    /// # Errors
    ///
    /// Returns error if the network connection fails or the request times out.
    /// Non-2xx statuses are returned as a normal response.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_response_status_checks() {
        let ok = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from("test"),
        };
        let missing = HttpResponse {
            status: 404,
            ..ok.clone()
        };

        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn test_forced_method_overrides_caller_value() {
        let config = RequestConfig::new()
            .method(HttpMethod::Post)
            .header("X-Trace", "1")
            .body(json!({"a": 1}));

        let forced = config.with_forced_method(HttpMethod::Get);

        assert_eq!(forced.method, Some(HttpMethod::Get));
        assert_eq!(forced.headers, config.headers);
        assert_eq!(forced.body, config.body);
        // The caller's value is left untouched.
        assert_eq!(config.method, Some(HttpMethod::Post));
    }

    #[test]
    fn test_request_config_wire_shape() {
        let config: RequestConfig =
            serde_json::from_value(json!({"method": "POST", "headers": {"A": "b"}})).unwrap();
        assert_eq!(config.method, Some(HttpMethod::Post));

        let value = serde_json::to_value(config.with_forced_method(HttpMethod::Get)).unwrap();
        assert_eq!(value, json!({"method": "GET", "headers": {"A": "b"}}));

        let empty = serde_json::to_value(RequestConfig::new()).unwrap();
        assert_eq!(empty, json!({}));
    }
}
