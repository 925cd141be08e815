//! Invocation protocol endpoints.
//!
//! - `POST /actor/v1/invoke/{instanceId}/{methodName}` runs one method
//! - `DELETE /actor/v1/deactivate/{instanceId}` discards one instance

use axum::{
    extract::{rejection::PathRejection, OriginalUri, Path, State},
    http::HeaderMap,
    routing::{delete, post},
    Json, Router,
};
use bytes::Bytes;
use kactor_protocol::{
    Envelope, InvocationError, InvocationTarget, DEACTIVATE_OK, INVOKE_PREFIX, SESSION_HEADER,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::actor::Args;
use crate::api::error::ApiError;
use crate::state::AppState;

const TIMED_OUT: &str = "invocation timed out";

/// Create invocation routes.
///
/// The catch-all never matches an empty target, so the bare prefix is routed
/// explicitly and answered with an error envelope.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/actor/v1/invoke", post(invoke))
        .route("/actor/v1/invoke/", post(invoke))
        .route("/actor/v1/invoke/{*target}", post(invoke))
        .route("/actor/v1/deactivate/{instance_id}", delete(deactivate))
}

/// Invoke a method on an actor instance, activating it if needed.
///
/// The body is read as raw bytes so any Content-Type is accepted.
async fn invoke(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Envelope>, ApiError> {
    let target = InvocationTarget::parse(raw_target(uri.path()))?;
    let args = parse_args(&body)?;

    check_session(&headers, &target);

    debug!(
        instance_id = %target.instance_id,
        method = %target.method,
        args = args.len(),
        "Invoking actor method"
    );

    let call = state
        .registry()
        .invoke(&target.instance_id, &target.method, args);

    let result = match state.invoke_timeout() {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(InvocationError::from),
            Err(_) => {
                // The method keeps running inside its instance; only the caller stops waiting.
                warn!(
                    instance_id = %target.instance_id,
                    method = %target.method,
                    timeout_ms = limit.as_millis() as u64,
                    "Invocation timed out"
                );
                Err(InvocationError::method(TIMED_OUT))
            }
        },
        None => call.await.map_err(InvocationError::from),
    };

    match result {
        Ok(value) => Ok(Json(Envelope::Value(value))),
        Err(err) => {
            debug!(
                instance_id = %target.instance_id,
                method = %target.method,
                kind = %err.kind(),
                error = %err,
                "Invocation failed"
            );
            Err(err.into())
        }
    }
}

/// Deactivate an actor instance. Always succeeds.
///
/// An id that cannot be decoded names no instance, so there is nothing to
/// discard.
async fn deactivate(
    State(state): State<AppState>,
    instance_id: Result<Path<String>, PathRejection>,
) -> &'static str {
    match instance_id {
        Ok(Path(instance_id)) => {
            state.registry().deactivate(&instance_id).await;
        }
        Err(e) => debug!(error = %e.body_text(), "Deactivation of undecodable instance id"),
    }
    DEACTIVATE_OK
}

/// The still-encoded target following the invoke prefix.
///
/// Decoding happens per segment in [`InvocationTarget::parse`], after
/// splitting, so an escaped `/` inside an id is not mistaken for a separator.
fn raw_target(path: &str) -> &str {
    let rest = path.strip_prefix(INVOKE_PREFIX).unwrap_or(path);
    rest.strip_prefix('/').unwrap_or(rest)
}

/// Decode the request body into positional arguments.
fn parse_args(body: &[u8]) -> Result<Args, InvocationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(values)) => Ok(Args::new(values)),
        _ => Err(InvocationError::invalid_request(InvocationError::INVALID_BODY)),
    }
}

/// Log invocations whose session token does not pin them to their instance.
fn check_session(headers: &HeaderMap, target: &InvocationTarget) {
    match headers.get(SESSION_HEADER).map(|v| v.to_str()) {
        Some(Ok(session)) if session == target.instance_id => {}
        Some(Ok(session)) => warn!(
            instance_id = %target.instance_id,
            session = %session,
            "Session token does not match instance id"
        ),
        Some(Err(_)) => warn!(
            instance_id = %target.instance_id,
            "Session token is not valid UTF-8"
        ),
        None => debug!(
            instance_id = %target.instance_id,
            "Invocation without session token"
        ),
    }
}
