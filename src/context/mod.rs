//! Request context consumed by the enricher.
//!
//! The enricher never touches framework types directly. It reads requests
//! through [`RequestContext`], which is implemented for `http` request types
//! and for the owned [`RequestSnapshot`].

mod http;
mod snapshot;

pub use snapshot::*;

/// Read-only view of an incoming HTTP request.
pub trait RequestContext {
    /// Request method, e.g. `GET`.
    fn method(&self) -> &str;

    /// `http` or `https`.
    fn protocol(&self) -> &str;

    fn host(&self) -> Option<&str>;

    /// Path and query as received.
    fn original_url(&self) -> &str;

    /// Client IP address, without port.
    fn remote_address(&self) -> Option<String>;

    /// Bytes read from the client so far.
    fn bytes_read(&self) -> u64;

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    fn header(&self, name: &str) -> Option<&str>;

    /// `<protocol>://<host><original_url>`
    fn request_url(&self) -> String {
        format!(
            "{}://{}{}",
            self.protocol(),
            self.host().unwrap_or_default(),
            self.original_url()
        )
    }
}
