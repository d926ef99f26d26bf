//! Resolver registry and selection.
//!
//! Maps the built-in backend names to constructed resolvers and picks one
//! for a query. Anything the registry does not recognize selects the Google
//! DoH backend.

use super::doh::{DohResolver, CLOUDFLARE_ENDPOINT, GOOGLE_ENDPOINT};
use super::{DigResolver, NativeResolver, Resolve};
use crate::http::{HttpTransport, HyperTransport};
use std::{
    fmt,
    net::IpAddr,
    path::PathBuf,
    sync::{Arc, LazyLock},
};

/// Names of the built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinResolver {
    Dig,
    Google,
    Cloudflare,
    Native,
}

impl BuiltinResolver {
    pub const ALL: [BuiltinResolver; 4] = [
        BuiltinResolver::Dig,
        BuiltinResolver::Google,
        BuiltinResolver::Cloudflare,
        BuiltinResolver::Native,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinResolver::Dig => "dig",
            BuiltinResolver::Google => "google",
            BuiltinResolver::Cloudflare => "cloudflare",
            BuiltinResolver::Native => "native",
        }
    }

    /// Exact, case-sensitive name match.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for BuiltinResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolver a query should use.
#[derive(Clone, Default)]
pub enum ResolverSpec {
    /// The default backend (Google DoH).
    #[default]
    Default,
    /// A backend by name; unknown names fall back to the default.
    Named(String),
    /// A caller-supplied resolver, used as is.
    Custom(Arc<dyn Resolve>),
}

impl fmt::Debug for ResolverSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverSpec::Default => f.write_str("Default"),
            ResolverSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ResolverSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for ResolverSpec {
    fn from(name: &str) -> Self {
        ResolverSpec::Named(name.to_string())
    }
}

impl From<String> for ResolverSpec {
    fn from(name: String) -> Self {
        ResolverSpec::Named(name)
    }
}

impl From<Option<&str>> for ResolverSpec {
    fn from(name: Option<&str>) -> Self {
        name.map_or(ResolverSpec::Default, ResolverSpec::from)
    }
}

impl From<BuiltinResolver> for ResolverSpec {
    fn from(builtin: BuiltinResolver) -> Self {
        ResolverSpec::Named(builtin.as_str().to_string())
    }
}

impl From<Arc<dyn Resolve>> for ResolverSpec {
    fn from(resolver: Arc<dyn Resolve>) -> Self {
        ResolverSpec::Custom(resolver)
    }
}

/// The built-in backends, constructed once and shared.
///
/// Use [`ResolverRegistry::builder()`] to point backends at other servers,
/// or [`ResolverRegistry::global()`] for the process-wide default.
#[derive(Clone)]
pub struct ResolverRegistry {
    dig: Arc<dyn Resolve>,
    google: Arc<dyn Resolve>,
    cloudflare: Arc<dyn Resolve>,
    native: Arc<dyn Resolve>,
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverRegistry {
    /// Registry with every backend in its default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Process-wide registry with default configuration, built on first use.
    pub fn global() -> &'static ResolverRegistry {
        static GLOBAL: LazyLock<ResolverRegistry> = LazyLock::new(ResolverRegistry::new);
        &GLOBAL
    }

    /// The backend registered under `name`.
    pub fn get(&self, name: BuiltinResolver) -> &Arc<dyn Resolve> {
        match name {
            BuiltinResolver::Dig => &self.dig,
            BuiltinResolver::Google => &self.google,
            BuiltinResolver::Cloudflare => &self.cloudflare,
            BuiltinResolver::Native => &self.native,
        }
    }

    pub fn default_resolver(&self) -> &Arc<dyn Resolve> {
        &self.google
    }

    /// Picks the resolver for `spec`.
    ///
    /// A custom resolver is returned as is; a recognized name returns that
    /// backend; everything else returns the default.
    pub fn select(&self, spec: impl Into<ResolverSpec>) -> Arc<dyn Resolve> {
        match spec.into() {
            ResolverSpec::Custom(resolver) => resolver,
            ResolverSpec::Named(name) => match BuiltinResolver::parse(&name) {
                Some(builtin) => self.get(builtin).clone(),
                None => {
                    tracing::debug!(resolver = %name, "unknown resolver name, using default");
                    self.default_resolver().clone()
                }
            },
            ResolverSpec::Default => self.default_resolver().clone(),
        }
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry").finish_non_exhaustive()
    }
}

/// Builder for a [`ResolverRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    dig_server: Option<String>,
    dig_program: Option<PathBuf>,
    native_servers: Option<Vec<IpAddr>>,
    native_support: Option<bool>,
    google_url: Option<String>,
    cloudflare_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl RegistryBuilder {
    /// Server passed to `dig` as `@server`.
    pub fn dig_server(mut self, server: impl Into<String>) -> Self {
        self.dig_server = Some(server.into());
        self
    }

    /// Path of the `dig` executable.
    pub fn dig_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.dig_program = Some(program.into());
        self
    }

    /// Upstream servers for the native backend instead of the system ones.
    /// An empty list keeps the system configuration.
    pub fn native_servers(mut self, servers: impl IntoIterator<Item = IpAddr>) -> Self {
        self.native_servers = Some(servers.into_iter().collect());
        self
    }

    /// Whether the environment supports native lookups (default `true`).
    pub fn native_support(mut self, supported: bool) -> Self {
        self.native_support = Some(supported);
        self
    }

    /// Endpoint for the `google` backend.
    pub fn google_url(mut self, url: impl Into<String>) -> Self {
        self.google_url = Some(url.into());
        self
    }

    /// Endpoint for the `cloudflare` backend.
    pub fn cloudflare_url(mut self, url: impl Into<String>) -> Self {
        self.cloudflare_url = Some(url.into());
        self
    }

    /// HTTP transport shared by the DoH backends.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> ResolverRegistry {
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HyperTransport::new()),
        };

        let mut dig = DigResolver::new();
        if let Some(program) = self.dig_program {
            dig = dig.program(program);
        }
        if let Some(server) = self.dig_server {
            dig = dig.server(server);
        }

        let native = if !self.native_support.unwrap_or(true) {
            NativeResolver::unavailable()
        } else if let Some(servers) = self.native_servers {
            NativeResolver::with_servers(&servers)
        } else {
            NativeResolver::new()
        };

        let google = DohResolver::with_transport(
            self.google_url.unwrap_or_else(|| GOOGLE_ENDPOINT.to_string()),
            transport.clone(),
        );
        let cloudflare = DohResolver::with_transport(
            self.cloudflare_url
                .unwrap_or_else(|| CLOUDFLARE_ENDPOINT.to_string()),
            transport,
        );

        ResolverRegistry {
            dig: Arc::new(dig),
            google: Arc::new(google),
            cloudflare: Arc::new(cloudflare),
            native: Arc::new(native),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::dnserror::DnsError;
    use crate::dns::Name;
    use crate::record::RecordType;

    #[test]
    fn test_builtin_names() {
        assert_eq!(BuiltinResolver::parse("dig"), Some(BuiltinResolver::Dig));
        assert_eq!(BuiltinResolver::parse("cloudflare"), Some(BuiltinResolver::Cloudflare));
        assert_eq!(BuiltinResolver::parse("Google"), None);
        assert_eq!(BuiltinResolver::parse("quad9"), None);
        for builtin in BuiltinResolver::ALL {
            assert_eq!(BuiltinResolver::parse(&builtin.to_string()), Some(builtin));
        }
    }

    #[test]
    fn test_spec_conversions() {
        assert!(matches!(ResolverSpec::from(None::<&str>), ResolverSpec::Default));
        assert!(matches!(
            ResolverSpec::from(Some("dig")),
            ResolverSpec::Named(ref n) if n == "dig"
        ));
        assert!(matches!(
            ResolverSpec::from(BuiltinResolver::Native),
            ResolverSpec::Named(ref n) if n == "native"
        ));
        assert_eq!(format!("{:?}", ResolverSpec::from("google")), "Named(\"google\")");
    }

    #[test]
    fn test_default_is_google() {
        let registry = ResolverRegistry::builder().native_support(false).build();
        let google = registry.get(BuiltinResolver::Google);
        assert!(Arc::ptr_eq(registry.default_resolver(), google));
        assert!(Arc::ptr_eq(&registry.select(ResolverSpec::Default), google));
        assert!(Arc::ptr_eq(&registry.select("no-such-backend"), google));
    }

    #[test]
    fn test_names_select_distinct_backends() {
        let registry = ResolverRegistry::builder().native_support(false).build();
        let picked: Vec<_> = BuiltinResolver::ALL
            .iter()
            .map(|b| registry.select(*b))
            .collect();
        for (i, a) in picked.iter().enumerate() {
            assert!(Arc::ptr_eq(a, registry.get(BuiltinResolver::ALL[i])));
            for b in &picked[i + 1..] {
                assert!(!Arc::ptr_eq(a, b));
            }
        }
    }

    #[tokio::test]
    async fn test_native_support_off() {
        let registry = ResolverRegistry::builder().native_support(false).build();
        let err = registry
            .select(BuiltinResolver::Native)
            .resolve(Name::new("example.com"), RecordType::A)
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::Environment));
    }

    #[test]
    fn test_global_is_shared() {
        let a = ResolverRegistry::global();
        let b = ResolverRegistry::global();
        assert!(std::ptr::eq(a, b));
        assert!(Arc::ptr_eq(
            a.get(BuiltinResolver::Dig),
            b.get(BuiltinResolver::Dig)
        ));
    }
}
