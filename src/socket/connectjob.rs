use crate::base::context::IoResultExt;
use crate::base::dnserror::DnsError;
use crate::socket::client::SocketType;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use url::{Host, Url};

/// Manages the connection process: address lookup -> TCP -> TLS.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(url: &Url) -> Result<SocketType, DnsError> {
        let secure = match url.scheme() {
            "https" => true,
            "http" => false,
            other => return Err(DnsError::InvalidUrl(format!("unsupported scheme {other}"))),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| DnsError::InvalidUrl(url.to_string()))?;

        // 1. Address lookup for the endpoint itself (system resolver);
        // IP literals are dialed as is, without the brackets of `host_str`
        let (host, addrs): (String, Vec<SocketAddr>) = match url.host() {
            Some(Host::Domain(domain)) => {
                let addrs = tokio::net::lookup_host((domain, port))
                    .await
                    .connection_context(domain, port)?;
                (domain.to_string(), addrs.collect())
            }
            Some(Host::Ipv4(ip)) => (ip.to_string(), vec![SocketAddr::new(ip.into(), port)]),
            Some(Host::Ipv6(ip)) => (ip.to_string(), vec![SocketAddr::new(ip.into(), port)]),
            None => return Err(DnsError::InvalidUrl(url.to_string())),
        };
        let host = host.as_str();

        // 2. TCP connect, first address that answers wins
        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "TCP connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        let stream = stream
            .ok_or_else(|| {
                last_err.unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "no addresses for endpoint")
                })
            })
            .connection_context(host, port)?;

        // 3. TLS handshake (if https)
        if secure {
            let tls_stream = Self::tls_connect(host, stream).await?;
            Ok(SocketType::Ssl(tls_stream))
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }

    async fn tls_connect(
        host: &str,
        stream: TcpStream,
    ) -> Result<tokio_boring::SslStream<TcpStream>, DnsError> {
        let tls_err = || DnsError::Tls {
            host: host.to_string(),
        };

        let mut builder = SslConnector::builder(SslMethod::tls()).map_err(|_| tls_err())?;
        builder
            .set_min_proto_version(Some(SslVersion::TLS1_2))
            .map_err(|_| tls_err())?;
        // Only HTTP/1.1 is spoken over this connection
        builder
            .set_alpn_protos(b"\x08http/1.1")
            .map_err(|_| tls_err())?;
        builder.set_verify(SslVerifyMode::PEER);

        let connector = builder.build();
        let mut config = connector.configure().map_err(|_| tls_err())?;
        // Per RFC 6066, SNI MUST NOT be set for raw IP addresses
        config.set_use_server_name_indication(host.parse::<std::net::IpAddr>().is_err());

        tokio_boring::connect(config, host, stream).await.map_err(|e| {
            tracing::debug!(host = %host, error = ?e, "TLS handshake failed");
            tls_err()
        })
    }
}
