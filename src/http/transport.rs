//! HTTP GET transport used by the DoH backend.
//!
//! The [`HttpTransport`] trait is the seam between the DoH resolver and the
//! network. [`HyperTransport`] is the default: one hyper HTTP/1.1 connection
//! per request over a socket from [`ConnectJob`], TLS by BoringSSL.

use crate::base::dnserror::DnsError;
use crate::http::response::HttpReply;
use crate::socket::ConnectJob;
use bytes::Bytes;
use http::header::{ACCEPT, HOST, USER_AGENT};
use http::Request;
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::{future::Future, pin::Pin, sync::Arc, time::Duration};
use url::{Position, Url};

/// Alias for the `Future` type returned by a transport.
pub type Fetching = Pin<Box<dyn Future<Output = Result<HttpReply, DnsError>> + Send>>;

/// Issues HTTP GET requests.
pub trait HttpTransport: Send + Sync {
    /// GET `url` with the given `Accept` media type and buffer the reply.
    ///
    /// Any status is a successful fetch; status checks belong to the caller.
    fn get(&self, url: Url, accept: &'static str) -> Fetching;
}

/// Blanket implementation for Arc-wrapped transports.
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn get(&self, url: Url, accept: &'static str) -> Fetching {
        (**self).get(url, accept)
    }
}

const DEFAULT_USER_AGENT: &str = concat!("digrs/", env!("CARGO_PKG_VERSION"));

/// Default transport: hyper HTTP/1.1 over tokio + BoringSSL.
///
/// No timeout is applied unless one is set with [`with_timeout`]; a stalled
/// endpoint otherwise stalls the lookup.
///
/// [`with_timeout`]: HyperTransport::with_timeout
#[derive(Debug, Clone, Default)]
pub struct HyperTransport {
    timeout: Option<Duration>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail requests that take longer than `timeout` end to end.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn fetch(url: Url, accept: &'static str) -> Result<HttpReply, DnsError> {
        let socket = ConnectJob::connect(&url).await?;

        let (mut sender, conn) = http1::handshake(TokioIo::new(socket))
            .await
            .map_err(|e| DnsError::Http(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "DoH connection closed with error");
            }
        });

        let authority = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(DnsError::InvalidUrl(url.to_string())),
        };

        let req = Request::get(&url[Position::BeforePath..])
            .header(HOST, authority)
            .header(ACCEPT, accept)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .body(Empty::<Bytes>::new())
            .map_err(|e| DnsError::Http(e.to_string()))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| DnsError::Http(e.to_string()))?;

        let (parts, body) = resp.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| DnsError::Http(e.to_string()))?
            .to_bytes();

        tracing::debug!(url = %url, status = %parts.status, bytes = body.len(), "DoH response received");
        Ok(HttpReply::from_parts(parts.status, parts.headers, body))
    }
}

impl HttpTransport for HyperTransport {
    fn get(&self, url: Url, accept: &'static str) -> Fetching {
        let timeout = self.timeout;
        Box::pin(async move {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, Self::fetch(url, accept)).await {
                    Ok(result) => result,
                    Err(_) => Err(DnsError::TimedOut),
                },
                None => Self::fetch(url, accept).await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_opt_in() {
        assert_eq!(HyperTransport::new().timeout(), None);
        let transport = HyperTransport::new().with_timeout(Duration::from_secs(5));
        assert_eq!(transport.timeout(), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let url = Url::parse("ftp://127.0.0.1:9/resolve").unwrap();
        let err = HyperTransport::new()
            .get(url, "application/dns-json")
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_timeout_fires() {
        // Accepts but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let url = Url::parse(&format!("http://{addr}/resolve")).unwrap();
        let err = HyperTransport::new()
            .with_timeout(Duration::from_millis(100))
            .get(url, "application/dns-json")
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::TimedOut));
    }
}
