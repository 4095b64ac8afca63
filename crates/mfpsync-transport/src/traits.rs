use bytes::Bytes;

use crate::error::Result;

/// One request/response round trip with the sync server.
///
/// The request is a buffer of encoded packets; the response is returned
/// fully materialized so the decoder can seek within it.
pub trait Transport {
    fn exchange(&mut self, request: Bytes) -> Result<Bytes>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn exchange(&mut self, request: Bytes) -> Result<Bytes> {
        (**self).exchange(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exchange(&mut self, request: Bytes) -> Result<Bytes> {
        (**self).exchange(request)
    }
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP client surface used by [`MultipartTransport`](crate::MultipartTransport).
pub trait HttpPost {
    /// POST `body` to `url` with the given headers and return the full response.
    fn post(&mut self, url: &str, headers: &[(&str, String)], body: Bytes) -> Result<HttpResponse>;
}
