//! # kactor-protocol
//!
//! Wire contract for the kactor virtual-actor invocation protocol.
//!
//! Both the runtime and the invocation client depend on this crate so the
//! two sides agree on paths, headers, and the response envelope.
//!
//! ## Endpoints
//!
//! - `POST /actor/v1/invoke/{instanceId}/{methodName}` with a JSON array of
//!   arguments as the body. Answers `200 {"value": ...}` or
//!   `400 {"error": "..."}`.
//! - `DELETE /actor/v1/deactivate/{instanceId}`. Always answers `200 OK`.
//!
//! Every invocation carries a `K-Session` header holding the instance id so
//! an external routing layer can pin all calls for one instance to the same
//! runtime replica.

mod envelope;
mod error;
mod routes;
mod target;

pub use envelope::{Envelope, EnvelopeError};
pub use error::{ErrorKind, InvocationError};
pub use routes::*;
pub use target::InvocationTarget;
