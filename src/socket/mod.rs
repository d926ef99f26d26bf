//! Sockets to DoH endpoints.
//!
//! [`ConnectJob`] walks address lookup, TCP connect and the BoringSSL
//! handshake; [`SocketType`] is the resulting plain or TLS stream.

pub mod client;
pub mod connectjob;

pub use client::SocketType;
pub use connectjob::ConnectJob;
