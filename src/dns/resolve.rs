//! Core resolver types and traits.
//!
//! This module defines the `Resolve` trait every backend implements, plus
//! the supporting `Name` type and the closure adapter used for custom
//! resolvers.

use crate::base::dnserror::DnsError;
use crate::record::{Record, RecordType};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// A host name to look records up for.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to resolvers.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for the `Future` type returned by a resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Vec<Record>, DnsError>> + Send>>;

/// Trait for record lookups.
///
/// Every backend (dig, DoH JSON, native) and every custom resolver handed
/// to the registry implements this. Implementations must be thread-safe.
///
/// # Contract
///
/// - A name with no records of the requested type resolves to an empty
///   list, never an error.
/// - Errors are reserved for backend faults (bad HTTP status, unreachable
///   endpoint, unavailable runtime) and malformed payloads.
/// - Uses `&self` so one instance can serve concurrent lookups.
pub trait Resolve: Send + Sync {
    /// Looks up all records of `rtype` for `name`.
    fn resolve(&self, name: Name, rtype: RecordType) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name, rtype: RecordType) -> Resolving {
        (**self).resolve(name, rtype)
    }
}

/// A [`Resolve`] implementation backed by a closure.
///
/// Build one with [`resolver_fn`].
pub struct FnResolver<F> {
    f: F,
}

/// Wraps a closure returning a lookup future as a resolver.
///
/// # Example
///
/// ```rust,ignore
/// use digrs::dns::resolver_fn;
/// use digrs::record::normalize;
///
/// let resolver = resolver_fn(|name, rtype| async move {
///     normalize(name.as_str(), rtype.as_str(), Some(60), "127.0.0.1").map(|r| vec![r])
/// });
/// ```
pub fn resolver_fn<F, Fut>(f: F) -> FnResolver<F>
where
    F: Fn(Name, RecordType) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Record>, DnsError>> + Send + 'static,
{
    FnResolver { f }
}

impl<F, Fut> Resolve for FnResolver<F>
where
    F: Fn(Name, RecordType) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Record>, DnsError>> + Send + 'static,
{
    fn resolve(&self, name: Name, rtype: RecordType) -> Resolving {
        Box::pin((self.f)(name, rtype))
    }
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}
