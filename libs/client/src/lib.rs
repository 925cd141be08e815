//! # kactor-client
//!
//! Invocation client for kactor virtual actors.
//!
//! The client builds one HTTP request per call, attaches the `K-Session`
//! header so a session-aware router can pin the call to the replica holding
//! the instance, and decodes the `{value}`/`{error}` envelope. It never
//! retries: a network or decode failure is returned to the caller as is.

mod address;
mod client;
mod error;

pub use address::{ServiceAddress, DEFAULT_CLUSTER_DOMAIN, DEFAULT_NAMESPACE};
pub use client::InvocationClient;
pub use error::ClientError;
