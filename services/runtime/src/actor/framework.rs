//! Core actor types and traits.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use async_trait::async_trait;

use super::args::Args;
use super::capability::{CapabilityError, CapabilityTable};

// =============================================================================
// Core Traits
// =============================================================================

/// Result of one method execution.
pub type MethodResult = Result<Value, MethodError>;

/// A method handler registered in a [`CapabilityTable`].
///
/// Handlers borrow the instance state mutably for the duration of the
/// returned future, so a handler may suspend on I/O while keeping exclusive
/// access to its instance.
pub type Handler<A> =
    for<'a> fn(&'a mut A, Args, &'a ActorContext) -> BoxFuture<'a, MethodResult>;

/// The Actor trait defines an actor type hosted by the runtime.
///
/// Actors:
/// - Start from `Default` state on every activation
/// - Process invocations one at a time (no internal concurrency)
/// - Own mutable state not shared with other instances
#[async_trait]
pub trait Actor: Default + Send + 'static {
    /// Actor type name for logging.
    const TYPE_NAME: &'static str;

    /// Build the capability table of this actor type.
    fn capabilities() -> Result<CapabilityTable<Self>, CapabilityError>;

    /// Called once when an instance is activated, before its first invocation.
    async fn on_activate(&mut self, _ctx: &ActorContext) {}

    /// Called once after an instance has been deactivated and has drained
    /// the invocations already queued for it.
    async fn on_deactivate(&mut self, _ctx: &ActorContext) {}
}

/// Context provided to actors during method execution.
#[derive(Debug, Clone)]
pub struct ActorContext {
    /// Instance id this actor was activated for.
    pub instance_id: String,

    /// Actor type name.
    pub actor_type: &'static str,

    /// When the instance was activated.
    pub activated_at: DateTime<Utc>,

    /// Invocations received by this instance, including the current one.
    pub invocations: u64,
}

impl ActorContext {
    /// Create a context for a freshly activated instance.
    pub fn new(instance_id: impl Into<String>, actor_type: &'static str) -> Self {
        Self {
            instance_id: instance_id.into(),
            actor_type,
            activated_at: Utc::now(),
            invocations: 0,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Failure signaled by a method body.
///
/// The message is forwarded verbatim to the caller in the error envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MethodError(pub String);

impl MethodError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for MethodError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for MethodError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<serde_json::Error> for MethodError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<std::io::Error> for MethodError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_starts_empty() {
        let ctx = ActorContext::new("a1", "Counter");
        assert_eq!(ctx.instance_id, "a1");
        assert_eq!(ctx.actor_type, "Counter");
        assert_eq!(ctx.invocations, 0);
    }

    #[test]
    fn test_method_error_message() {
        let err = MethodError::from("out of stock");
        assert_eq!(err.to_string(), "out of stock");
        assert_eq!(err.message(), "out of stock");
    }
}
