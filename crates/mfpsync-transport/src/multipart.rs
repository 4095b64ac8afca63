use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{HttpPost, Transport};

/// Endpoint every sync exchange is posted to.
pub const SYNC_URL: &str = "https://www.myfitnesspal.com/iphone_api/synchronize";

/// User agent of the Android client the server expects.
pub const USER_AGENT: &str = "Dalvik/1.6.0 (Linux; U; Android 4.4.2; sdk Build/KK)";

/// Length of the generated MIME boundary.
pub const BOUNDARY_LEN: usize = 78;

const PART_HEADERS: &str = "Content-Disposition: form-data; name=\"syncdata\"; filename=\"syncdata.dat\"\r\n\
                            Content-Type: application/octet-stream\r\n";

/// An encoded request wrapped as a single-part `multipart/form-data` POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartRequest {
    boundary: String,
    body: Bytes,
}

impl MultipartRequest {
    /// Wrap `data` using a random lowercase boundary.
    pub fn new(data: &[u8]) -> Self {
        Self::with_boundary(random_boundary(&mut rand::thread_rng()), data)
    }

    /// Wrap `data` using an explicit boundary.
    pub fn with_boundary(boundary: impl Into<String>, data: &[u8]) -> Self {
        let boundary = boundary.into();
        let mut body = BytesMut::with_capacity(data.len() + 2 * boundary.len() + 160);
        body.put_slice(b"--");
        body.put_slice(boundary.as_bytes());
        body.put_slice(b"\r\n");
        body.put_slice(PART_HEADERS.as_bytes());
        body.put_slice(b"\r\n");
        body.put_slice(data);
        body.put_slice(b"\r\n--");
        body.put_slice(boundary.as_bytes());
        body.put_slice(b"--\r\n");

        Self {
            boundary,
            body: body.freeze(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("User-Agent", USER_AGENT.to_string()),
            (
                "Content-Type",
                format!("multipart/form-data; boundary={}", self.boundary),
            ),
            ("Content-Length", self.body.len().to_string()),
        ]
    }
}

fn random_boundary<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..BOUNDARY_LEN)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}

/// [`Transport`] over an HTTP client, posting to [`SYNC_URL`].
#[derive(Debug)]
pub struct MultipartTransport<H> {
    client: H,
    url: String,
}

impl<H: HttpPost> MultipartTransport<H> {
    pub fn new(client: H) -> Self {
        Self::with_url(client, SYNC_URL)
    }

    pub fn with_url(client: H, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn client(&self) -> &H {
        &self.client
    }

    pub fn into_inner(self) -> H {
        self.client
    }
}

impl<H: HttpPost> Transport for MultipartTransport<H> {
    fn exchange(&mut self, request: Bytes) -> Result<Bytes> {
        let multipart = MultipartRequest::new(&request);
        let headers = multipart.headers();

        debug!(url = %self.url, body_len = multipart.body().len(), "posting sync request");
        let response = self
            .client
            .post(&self.url, &headers, multipart.body().clone())?;

        if !response.is_success() {
            return Err(TransportError::Status {
                code: response.status,
            });
        }
        debug!(status = response.status, len = response.body.len(), "received sync response");
        Ok(response.body)
    }
}
