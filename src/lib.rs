//! # digrs
//!
//! DNS record lookup across several backends, with one record model.
//!
//! `digrs` asks the `dig` tool, a DNS-over-HTTPS JSON endpoint or the native
//! stub resolver for records and hands back the same [`Record`] shape
//! whichever answered: trailing root dots stripped, TTLs as numbers, MX,
//! SOA, CAA, NAPTR and SRV payloads as structured data.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> Result<(), digrs::DnsError> {
//!     for record in digrs::query("example.com", Some("MX"), "google").await? {
//!         println!("{record}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`dns`] - Resolvers, registry, all-types lookup and the query entry point
//! - [`http`] - HTTP transport for the DoH backends
//! - [`record`] - Record model and normalizer
//! - [`socket`] - TCP and TLS connection setup

pub mod base;
pub mod dns;
pub mod http;
pub mod record;
pub mod socket;

pub use base::dnserror::DnsError;
pub use dns::{query, resolve_all, resolver_fn, Resolve, ResolverRegistry, ResolverSpec};
pub use record::{normalize, Record, RecordData, RecordType};
