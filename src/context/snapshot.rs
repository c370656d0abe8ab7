//! Owned request snapshot.
//!
//! A snapshot outlives the request it was taken from, which lets middleware
//! attach it to the response (see [`attached_request`]) and lets tests build
//! contexts without a web framework.

use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{request::Parts, HeaderMap, Request, Response, Uri};

use super::http::{header_of, original_url_of};
use super::RequestContext;
use crate::error::{LoggerError, LoggerResult};

/// Owned copy of the request fields the enricher reads.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    method: String,
    protocol: String,
    host: Option<String>,
    original_url: String,
    remote_address: Option<String>,
    bytes_read: u64,
    headers: HeaderMap,
}

impl RequestSnapshot {
    /// Snapshot of a request described by method and absolute URL.
    pub fn new(method: impl Into<String>, url: &str) -> LoggerResult<Self> {
        let uri: Uri = url
            .parse()
            .map_err(|e| LoggerError::InvalidContext(format!("invalid URL '{}': {}", url, e)))?;

        Ok(Self {
            method: method.into().to_uppercase(),
            protocol: uri.scheme_str().unwrap_or("http").to_string(),
            host: uri.authority().map(|a| a.as_str().to_string()),
            original_url: original_url_of(&uri).to_string(),
            remote_address: None,
            bytes_read: 0,
            headers: HeaderMap::new(),
        })
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::capture(request, request.headers())
    }

    pub fn from_parts(parts: &Parts) -> Self {
        Self::capture(parts, &parts.headers)
    }

    fn capture(request: &dyn RequestContext, headers: &HeaderMap) -> Self {
        Self {
            method: request.method().to_string(),
            protocol: request.protocol().to_string(),
            host: request.host().map(str::to_string),
            original_url: request.original_url().to_string(),
            remote_address: request.remote_address(),
            bytes_read: request.bytes_read(),
            headers: headers.clone(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> LoggerResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| LoggerError::InvalidContext(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| LoggerError::InvalidContext(format!("invalid value for '{}': {}", name, e)))?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn with_remote_address(mut self, address: impl Into<String>) -> Self {
        self.remote_address = Some(address.into());
        self
    }

    pub fn with_bytes_read(mut self, bytes: u64) -> Self {
        self.bytes_read = bytes;
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl RequestContext for RequestSnapshot {
    fn method(&self) -> &str {
        &self.method
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn original_url(&self) -> &str {
        &self.original_url
    }

    fn remote_address(&self) -> Option<String> {
        self.remote_address.clone()
    }

    fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_of(&self.headers, name)
    }
}

/// Request snapshot attached to a response by the logging middleware.
pub fn attached_request<B>(response: &Response<B>) -> Option<&RequestSnapshot> {
    response.extensions().get::<RequestSnapshot>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_new_parses_absolute_url() {
        let snapshot = RequestSnapshot::new("get", "http://x/y").unwrap();

        assert_eq!(snapshot.method(), "GET");
        assert_eq!(snapshot.protocol(), "http");
        assert_eq!(snapshot.host(), Some("x"));
        assert_eq!(snapshot.original_url(), "/y");
        assert_eq!(snapshot.request_url(), "http://x/y");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = RequestSnapshot::new("GET", "http://bad host/").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidContext(_)));
    }

    #[test]
    fn test_builder_fields() {
        let snapshot = RequestSnapshot::new("POST", "https://api.example/orders")
            .unwrap()
            .with_header("User-Agent", "curl/8.0")
            .unwrap()
            .with_remote_address("203.0.113.9")
            .with_bytes_read(512);

        assert_eq!(snapshot.header("user-agent"), Some("curl/8.0"));
        assert_eq!(snapshot.remote_address().as_deref(), Some("203.0.113.9"));
        assert_eq!(snapshot.bytes_read(), 512);
    }

    #[test]
    fn test_with_header_rejects_invalid_name() {
        let result = RequestSnapshot::new("GET", "http://x/")
            .unwrap()
            .with_header("bad header", "v");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_request_copies_headers() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/items/3")
            .header("host", "inventory.internal")
            .header("x-cloud-trace-context", "t1/2;o=1")
            .body(Body::empty())
            .unwrap();

        let snapshot = RequestSnapshot::from_request(&request);
        assert_eq!(snapshot.method(), "DELETE");
        assert_eq!(snapshot.request_url(), "http://inventory.internal/items/3");
        assert_eq!(snapshot.header("x-cloud-trace-context"), Some("t1/2;o=1"));
    }

    #[test]
    fn test_attached_request() {
        let snapshot = RequestSnapshot::new("GET", "http://x/y").unwrap();
        let mut response = Response::new(Body::empty());
        assert!(attached_request(&response).is_none());

        response.extensions_mut().insert(snapshot);
        let attached = attached_request(&response).unwrap();
        assert_eq!(attached.original_url(), "/y");
    }
}
