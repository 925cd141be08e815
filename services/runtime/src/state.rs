//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::registry::Registry;

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Registry,
    invoke_timeout: Option<Duration>,
}

impl AppState {
    /// Create a new application state owning `registry`.
    pub fn new(registry: Registry) -> Self {
        Self::with_invoke_timeout(registry, None)
    }

    /// Create a new application state with a bound on how long a caller
    /// waits for a method to complete.
    pub fn with_invoke_timeout(registry: Registry, invoke_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                invoke_timeout,
            }),
        }
    }

    /// Get a reference to the actor registry.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// How long a caller waits for a method, if bounded.
    pub fn invoke_timeout(&self) -> Option<Duration> {
        self.inner.invoke_timeout
    }
}
