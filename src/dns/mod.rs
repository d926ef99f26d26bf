//! DNS record lookup.
//!
//! Provides pluggable record lookup with support for:
//! - The `dig` command-line tool
//! - DNS-over-HTTPS JSON endpoints (Google, Cloudflare)
//! - The native async stub resolver (hickory-dns)
//!
//! # Architecture
//!
//! The [`Resolve`] trait is the core abstraction: every backend, and any
//! custom resolver a caller hands in, answers `(name, type)` with a list of
//! normalized [`Record`](crate::record::Record)s. The [`ResolverRegistry`]
//! maps backend names to instances, [`resolve_all`] runs every type at once,
//! and [`query`] ties the two together.
//!
//! # Example
//!
//! ```rust,ignore
//! use digrs::dns::{query, BuiltinResolver};
//!
//! let records = query("example.com", Some("A"), BuiltinResolver::Cloudflare).await?;
//! for record in &records {
//!     println!("{record}");
//! }
//! ```

mod dig;
mod doh;
mod fanout;
mod hickory;
mod query;
mod registry;
mod resolve;

pub use dig::{parse_answer, DigResolver};
pub use doh::{type_mnemonic, DohResolver, CLOUDFLARE_ENDPOINT, DNS_JSON, GOOGLE_ENDPOINT};
pub use fanout::resolve_all;
pub use hickory::NativeResolver;
pub use query::{lookup, query};
pub use registry::{BuiltinResolver, RegistryBuilder, ResolverRegistry, ResolverSpec};
pub use resolve::{resolver_fn, FnResolver, Name, Resolve, Resolving};
