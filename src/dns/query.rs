//! Top-level query entry points.
//!
//! A query names a type or it does not. A recognized type (case-insensitive)
//! goes straight to the resolver and its errors surface; no type, or a type
//! string that is not recognized, runs the all-types lookup, which never
//! fails.

use super::registry::{ResolverRegistry, ResolverSpec};
use super::{resolve_all, Name, Resolve};
use crate::base::dnserror::DnsError;
use crate::record::{Record, RecordType};

/// Looks `host` up with `resolver`.
pub async fn lookup<R>(resolver: &R, host: &str, rtype: Option<&str>) -> Result<Vec<Record>, DnsError>
where
    R: Resolve + ?Sized,
{
    match rtype.and_then(RecordType::parse) {
        Some(rtype) => resolver.resolve(Name::new(host), rtype).await,
        None => {
            if let Some(unknown) = rtype {
                tracing::debug!(host = %host, rtype = %unknown, "unrecognized type, querying all types");
            }
            Ok(resolve_all(host, resolver).await)
        }
    }
}

impl ResolverRegistry {
    /// Looks `host` up with the resolver `spec` selects.
    pub async fn query(
        &self,
        host: &str,
        rtype: Option<&str>,
        spec: impl Into<ResolverSpec>,
    ) -> Result<Vec<Record>, DnsError> {
        let resolver = self.select(spec);
        lookup(&resolver, host, rtype).await
    }
}

/// Looks `host` up through the [global registry](ResolverRegistry::global).
///
/// # Example
///
/// ```rust,ignore
/// // MX records from Cloudflare
/// let records = digrs::query("example.com", Some("mx"), "cloudflare").await?;
///
/// // Every type, default backend
/// let records = digrs::query("example.com", None, ResolverSpec::Default).await?;
/// ```
pub async fn query(
    host: &str,
    rtype: Option<&str>,
    spec: impl Into<ResolverSpec>,
) -> Result<Vec<Record>, DnsError> {
    ResolverRegistry::global().query(host, rtype, spec).await
}
