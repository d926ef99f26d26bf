use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DnsError {
    // Record parsing
    #[error("Invalid {rtype} record format: {reason}")]
    Format { rtype: &'static str, reason: String },

    // Backend faults
    #[error("Error fetching DNS records for {host}: {status} {reason}")]
    Transport {
        host: String,
        status: u16,
        reason: String,
    },
    #[error("Native resolver cannot be used in this runtime")]
    Environment,

    // HTTP transport
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Connection to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: Arc<std::io::Error>,
    },
    #[error("TLS handshake with {host} failed")]
    Tls { host: String },
    #[error("HTTP exchange failed: {0}")]
    Http(String),
    #[error("Response body is not valid DNS JSON: {0}")]
    InvalidJson(String),
    #[error("Request timed out")]
    TimedOut,
}

impl DnsError {
    /// Create a format error for the given record type.
    pub fn format(rtype: &'static str, reason: impl Into<String>) -> Self {
        DnsError::Format {
            rtype,
            reason: reason.into(),
        }
    }

    /// Create a transport error from an unsuccessful HTTP status.
    pub fn transport(host: impl Into<String>, status: http::StatusCode) -> Self {
        DnsError::Transport {
            host: host.into(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// Create a connection error with host context.
    pub fn connection_failed_to(host: &str, port: u16, source: std::io::Error) -> Self {
        DnsError::Connection {
            host: host.to_string(),
            port,
            source: Arc::new(source),
        }
    }

    /// Returns true for malformed record payloads.
    pub fn is_format(&self) -> bool {
        matches!(self, DnsError::Format { .. })
    }

    /// Returns true for faults raised by a backend rather than by parsing.
    pub fn is_backend_fault(&self) -> bool {
        !self.is_format()
    }
}
