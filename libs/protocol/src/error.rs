//! Invocation error taxonomy.

use thiserror::Error;

use crate::Envelope;

/// Failures an invocation can report through the error envelope.
///
/// Every variant is local to a single invocation. None of them affects the
/// registry or any other actor instance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// Malformed target or request body.
    #[error("{0}")]
    InvalidRequest(String),

    /// The method name is not a capability of the actor type.
    #[error("undefined method")]
    UndefinedMethod,

    /// The method body signaled failure. The message is forwarded verbatim.
    #[error("{0}")]
    Method(String),
}

/// Coarse classification of an [`InvocationError`], used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    UndefinedMethod,
    Method,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::UndefinedMethod => "undefined_method",
            ErrorKind::Method => "method_error",
        };
        write!(f, "{}", s)
    }
}

impl InvocationError {
    pub const INVALID_ACTOR_ID: &'static str = "invalid actor id";
    pub const INVALID_METHOD_NAME: &'static str = "invalid method name";
    pub const INVALID_BODY: &'static str =
        "invalid request body: expected a JSON array of arguments";
    pub const INTERNAL_ERROR: &'static str = "internal error";

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn method(message: impl Into<String>) -> Self {
        Self::Method(message.into())
    }

    /// Error reported when a method body could not produce a message of its own.
    pub fn internal() -> Self {
        Self::Method(Self::INTERNAL_ERROR.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            InvocationError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            InvocationError::UndefinedMethod => ErrorKind::UndefinedMethod,
            InvocationError::Method(_) => ErrorKind::Method,
        }
    }
}

impl From<InvocationError> for Envelope {
    fn from(err: InvocationError) -> Self {
        Envelope::Error(err.to_string())
    }
}
