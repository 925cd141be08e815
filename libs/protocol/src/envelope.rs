//! Invocation response envelope.
//!
//! On the wire a success is `{"value": <any>}` and a failure is
//! `{"error": "<message>"}`. A success always carries the `value` key, even
//! when the method returned nothing (`{"value": null}`).

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::InvocationError;

/// The `{value}`/`{error}` response wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Value(Value),
    Error(String),
}

/// Errors decoding a response body into an [`Envelope`].
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed response envelope: {0}")]
    Malformed(String),

    #[error("response envelope has neither a value nor an error")]
    Empty,
}

impl Envelope {
    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Error(_))
    }

    /// Decode an envelope from a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, EnvelopeError> {
        let fields: Map<String, Value> =
            serde_json::from_slice(body).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
        Self::from_fields(fields)
    }

    fn from_fields(mut fields: Map<String, Value>) -> Result<Self, EnvelopeError> {
        match fields.remove("error") {
            Some(Value::String(message)) => return Ok(Envelope::Error(message)),
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(EnvelopeError::Malformed(format!(
                    "error must be a string, got {other}"
                )))
            }
        }

        fields.remove("value").map(Envelope::Value).ok_or(EnvelopeError::Empty)
    }

    /// Convert into the success value or the error message.
    pub fn into_result(self) -> Result<Value, String> {
        match self {
            Envelope::Value(value) => Ok(value),
            Envelope::Error(message) => Err(message),
        }
    }
}

impl From<Result<Value, InvocationError>> for Envelope {
    fn from(result: Result<Value, InvocationError>) -> Self {
        match result {
            Ok(value) => Envelope::Value(value),
            Err(err) => err.into(),
        }
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Envelope::Value(value) => map.serialize_entry("value", value)?,
            Envelope::Error(message) => map.serialize_entry("error", message)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Envelope::from_fields(fields).map_err(de::Error::custom)
    }
}
