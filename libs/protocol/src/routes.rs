//! Route paths and header names.

/// Header carrying the session token used for replica affinity.
pub const SESSION_HEADER: &str = "K-Session";

/// Path prefix for method invocations.
pub const INVOKE_PREFIX: &str = "/actor/v1/invoke";

/// Path prefix for deactivation.
pub const DEACTIVATE_PREFIX: &str = "/actor/v1/deactivate";

/// Body returned by the deactivation endpoint.
pub const DEACTIVATE_OK: &str = "OK";

/// Build the invocation path for an instance and method.
///
/// Segments are inserted verbatim; callers that accept arbitrary ids should
/// escape them (the client does this through `reqwest::Url`).
pub fn invoke_path(instance_id: &str, method: &str) -> String {
    format!("{INVOKE_PREFIX}/{instance_id}/{method}")
}

/// Build the deactivation path for an instance.
pub fn deactivate_path(instance_id: &str) -> String {
    format!("{DEACTIVATE_PREFIX}/{instance_id}")
}
