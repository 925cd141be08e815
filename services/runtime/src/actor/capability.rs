//! Capability tables: method name to handler mappings.

use std::collections::HashMap;

use thiserror::Error;

use super::framework::Handler;

/// Errors found while building a capability table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("method name cannot be empty")]
    EmptyName,

    #[error("method '{0}' is registered more than once")]
    Duplicate(String),

    #[error("actor type exposes no methods")]
    NoMethods,
}

/// The invocable methods of one actor type.
pub struct CapabilityTable<A> {
    methods: HashMap<&'static str, Handler<A>>,
}

impl<A> CapabilityTable<A> {
    pub fn builder() -> CapabilityTableBuilder<A> {
        CapabilityTableBuilder {
            methods: Vec::new(),
        }
    }

    /// Look up the handler for a method name.
    pub fn resolve(&self, method: &str) -> Option<Handler<A>> {
        self.methods.get(method).copied()
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Method names in sorted order.
    pub fn method_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<A> std::fmt::Debug for CapabilityTable<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityTable")
            .field("methods", &self.method_names())
            .finish()
    }
}

/// Builder for a [`CapabilityTable`].
pub struct CapabilityTableBuilder<A> {
    methods: Vec<(&'static str, Handler<A>)>,
}

impl<A> CapabilityTableBuilder<A> {
    /// Register a handler under `name`.
    pub fn method(mut self, name: &'static str, handler: Handler<A>) -> Self {
        self.methods.push((name, handler));
        self
    }

    /// Validate the registrations and build the table.
    pub fn build(self) -> Result<CapabilityTable<A>, CapabilityError> {
        if self.methods.is_empty() {
            return Err(CapabilityError::NoMethods);
        }

        let mut methods = HashMap::with_capacity(self.methods.len());
        for (name, handler) in self.methods {
            if name.is_empty() {
                return Err(CapabilityError::EmptyName);
            }
            if methods.insert(name, handler).is_some() {
                return Err(CapabilityError::Duplicate(name.to_string()));
            }
        }

        Ok(CapabilityTable { methods })
    }
}
