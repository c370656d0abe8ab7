//! [`RequestContext`] for `http` request types as seen by axum handlers.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{header, request::Parts, Extensions, HeaderMap, Request, Uri};

use super::RequestContext;

pub(crate) fn protocol_of<'a>(uri: &'a Uri, headers: &'a HeaderMap) -> &'a str {
    // Behind Google front ends TLS is terminated before the service.
    uri.scheme_str()
        .or_else(|| {
            header_of(headers, "x-forwarded-proto")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .unwrap_or("http")
}

pub(crate) fn host_of<'a>(uri: &'a Uri, headers: &'a HeaderMap) -> Option<&'a str> {
    header_of(headers, header::HOST.as_str()).or_else(|| uri.authority().map(|a| a.as_str()))
}

pub(crate) fn original_url_of(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

pub(crate) fn remote_address_of(extensions: &Extensions) -> Option<String> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// The body is not consumed here, so the declared length stands in for it.
pub(crate) fn bytes_read_of(headers: &HeaderMap) -> u64 {
    header_of(headers, header::CONTENT_LENGTH.as_str())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

pub(crate) fn header_of<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl<B> RequestContext for Request<B> {
    fn method(&self) -> &str {
        Request::method(self).as_str()
    }

    fn protocol(&self) -> &str {
        protocol_of(self.uri(), self.headers())
    }

    fn host(&self) -> Option<&str> {
        host_of(self.uri(), self.headers())
    }

    fn original_url(&self) -> &str {
        original_url_of(self.uri())
    }

    fn remote_address(&self) -> Option<String> {
        remote_address_of(self.extensions())
    }

    fn bytes_read(&self) -> u64 {
        bytes_read_of(self.headers())
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_of(self.headers(), name)
    }
}

impl RequestContext for Parts {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn protocol(&self) -> &str {
        protocol_of(&self.uri, &self.headers)
    }

    fn host(&self) -> Option<&str> {
        host_of(&self.uri, &self.headers)
    }

    fn original_url(&self) -> &str {
        original_url_of(&self.uri)
    }

    fn remote_address(&self) -> Option<String> {
        remote_address_of(&self.extensions)
    }

    fn bytes_read(&self) -> u64 {
        bytes_read_of(&self.headers)
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_of(&self.headers, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("host", "shop.example")
            .header("content-length", "17")
            .header("user-agent", "curl/8.0")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_request_context_from_origin_form() {
        let req = request("/cart?id=1");

        assert_eq!(RequestContext::method(&req), "POST");
        assert_eq!(req.protocol(), "http");
        assert_eq!(req.host(), Some("shop.example"));
        assert_eq!(req.original_url(), "/cart?id=1");
        assert_eq!(req.bytes_read(), 17);
        assert_eq!(req.request_url(), "http://shop.example/cart?id=1");
        assert_eq!(req.remote_address(), None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = request("/");
        assert_eq!(req.header("User-Agent"), Some("curl/8.0"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn test_forwarded_proto_and_connect_info() {
        let mut req = Request::builder()
            .uri("/health")
            .header("host", "api.example")
            .header("x-forwarded-proto", "https, http")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 51234))));

        assert_eq!(req.protocol(), "https");
        assert_eq!(req.remote_address().as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn test_absolute_uri_scheme_wins() {
        let req = Request::builder()
            .uri("https://secure.example/login")
            .body(Body::empty())
            .unwrap();
        let (parts, _) = req.into_parts();

        assert_eq!(parts.protocol(), "https");
        assert_eq!(parts.host(), Some("secure.example"));
        assert_eq!(parts.original_url(), "/login");
        assert_eq!(parts.bytes_read(), 0);
    }
}
