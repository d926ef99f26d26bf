//! Buffered HTTP response.

use crate::base::dnserror::DnsError;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// A fully read HTTP response.
///
/// DoH JSON answers are small, so the transport buffers the whole body
/// before handing it back.
#[derive(Debug, Clone)]
pub struct HttpReply {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpReply {
    /// Build a reply with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Build a reply from parts read off the wire.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, DnsError> {
        serde_json::from_slice(&self.body).map_err(|e| DnsError::InvalidJson(e.to_string()))
    }
}
