//! HTTP plumbing for the DoH backend.

pub mod response;
pub mod transport;

pub use response::HttpReply;
pub use transport::{Fetching, HttpTransport, HyperTransport};
