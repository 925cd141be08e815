//! Positional JSON arguments of an invocation.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::framework::MethodError;

/// Ordered, loosely typed arguments of one invocation.
///
/// A position past the end of the list reads as JSON `null`, so a method
/// called with fewer arguments than it declares sees `null` for the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `index`, or `null` when absent.
    pub fn get(&self, index: usize) -> Value {
        self.0.get(index).cloned().unwrap_or(Value::Null)
    }

    /// Move the argument at `index` out, leaving `null` in its place.
    pub fn take(&mut self, index: usize) -> Value {
        self.0.get_mut(index).map(Value::take).unwrap_or(Value::Null)
    }

    /// Argument at `index`, failing when the caller did not supply it.
    pub fn required(&self, index: usize) -> Result<&Value, MethodError> {
        self.0
            .get(index)
            .ok_or_else(|| MethodError(format!("missing argument {index}")))
    }

    /// Deserialize the argument at `index` into `T`.
    pub fn parse<T: DeserializeOwned>(&self, index: usize) -> Result<T, MethodError> {
        serde_json::from_value(self.get(index))
            .map_err(|e| MethodError(format!("argument {index}: {e}")))
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}
