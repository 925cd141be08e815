//! Actor framework for the runtime.
//!
//! An actor type is plain Rust state plus a capability table: a mapping from
//! method name to a statically typed handler. The table is built and
//! validated once, when a [`Registry`](crate::registry::Registry) is created
//! for the type, and every invocation is resolved against it by name.
//!
//! ## Design Principles
//!
//! - **One task per instance**: each activated instance owns its state and
//!   processes invocations one at a time, in arrival order
//! - **Loosely typed arguments**: handlers receive the raw JSON argument list
//!   as [`Args`] and validate it themselves
//! - **Local failures**: a failing or panicking method only fails its own
//!   invocation; the instance keeps whatever state the body left behind

mod args;
mod capability;
mod framework;
mod scaffold;

pub use args::Args;
pub use capability::{CapabilityError, CapabilityTable, CapabilityTableBuilder};
pub use framework::{Actor, ActorContext, Handler, MethodError, MethodResult};
pub use scaffold::ScaffoldActor;
