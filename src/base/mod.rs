//! Base types and error handling.
//!
//! - [`DnsError`](dnserror::DnsError): every failure a lookup can surface
//! - [`IoResultExt`](context::IoResultExt): host context for IO errors

pub mod context;
pub mod dnserror;
