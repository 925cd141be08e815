//! Parsing of the `{instanceId}/{methodName}` invocation target.

use crate::InvocationError;

/// The instance and method addressed by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTarget {
    pub instance_id: String,
    pub method: String,
}

impl InvocationTarget {
    /// Create a target, rejecting empty ids and method names.
    pub fn new(
        instance_id: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, InvocationError> {
        let instance_id = instance_id.into();
        let method = method.into();

        if instance_id.is_empty() {
            return Err(InvocationError::invalid_request(
                InvocationError::INVALID_ACTOR_ID,
            ));
        }
        if method.is_empty() {
            return Err(InvocationError::invalid_request(
                InvocationError::INVALID_METHOD_NAME,
            ));
        }

        Ok(Self {
            instance_id,
            method,
        })
    }

    /// Parse the part of the request path following the invoke prefix.
    ///
    /// `target` is the raw, still percent-encoded path. It must hold exactly
    /// two non-empty segments separated by `/`. Each segment is decoded after
    /// splitting, so an id containing an escaped `/` (`%2F`) stays one id.
    pub fn parse(target: &str) -> Result<Self, InvocationError> {
        let mut segments = target.split('/');

        let instance_id = segments.next().unwrap_or_default();
        let method = segments.next().unwrap_or_default();
        if segments.next().is_some() {
            if instance_id.is_empty() {
                return Err(InvocationError::invalid_request(
                    InvocationError::INVALID_ACTOR_ID,
                ));
            }
            return Err(InvocationError::invalid_request(
                InvocationError::INVALID_METHOD_NAME,
            ));
        }

        let instance_id = decode_segment(instance_id, InvocationError::INVALID_ACTOR_ID)?;
        let method = decode_segment(method, InvocationError::INVALID_METHOD_NAME)?;

        Self::new(instance_id, method)
    }
}

/// Percent-decode one path segment. Invalid UTF-8 is reported as `message`.
fn decode_segment(segment: &str, message: &str) -> Result<String, InvocationError> {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| InvocationError::invalid_request(message))
}

impl std::fmt::Display for InvocationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.instance_id, self.method)
    }
}
