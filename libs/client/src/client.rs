//! HTTP invocation client.

use kactor_protocol::{Envelope, DEACTIVATE_PREFIX, INVOKE_PREFIX, SESSION_HEADER};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::{ClientError, ServiceAddress};

/// Client for invoking and deactivating actor instances on one service.
#[derive(Debug, Clone)]
pub struct InvocationClient {
    client: reqwest::Client,
    base_url: Url,
}

impl InvocationClient {
    /// Create a client for an explicit base URL, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Create a client addressing a service by name inside a cluster.
    pub fn for_service(address: &ServiceAddress) -> Result<Self, ClientError> {
        Self::new(&address.base_url())
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Invoke `method` on `instance_id` with JSON arguments.
    pub async fn invoke(
        &self,
        instance_id: &str,
        method: &str,
        args: &[Value],
    ) -> Result<Value, ClientError> {
        let body = Value::Array(args.to_vec()).to_string();
        self.send_invoke(instance_id, method, body).await
    }

    /// Invoke `method` with arguments given as raw JSON literals.
    ///
    /// The literals are joined into the array body without being parsed, so
    /// a malformed literal is reported by the runtime as an invalid request.
    pub async fn invoke_raw(
        &self,
        instance_id: &str,
        method: &str,
        args: &[String],
    ) -> Result<Value, ClientError> {
        let body = format!("[{}]", args.join(","));
        self.send_invoke(instance_id, method, body).await
    }

    /// Deactivate `instance_id`, discarding its state.
    pub async fn deactivate(&self, instance_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(DEACTIVATE_PREFIX, &[instance_id])?;
        debug!(url = %url, "Deactivating actor instance");

        self.client
            .delete(url)
            .header(SESSION_HEADER, session_value(instance_id)?)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn send_invoke(
        &self,
        instance_id: &str,
        method: &str,
        body: String,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(INVOKE_PREFIX, &[instance_id, method])?;
        debug!(url = %url, "Invoking actor method");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(SESSION_HEADER, session_value(instance_id)?)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let envelope = Envelope::from_slice(&bytes).map_err(|e| ClientError::Decode {
            status,
            message: e.to_string(),
        })?;

        envelope.into_result().map_err(ClientError::Remote)
    }

    /// Append a route prefix and escaped segments to the base URL.
    fn endpoint(&self, prefix: &str, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(prefix.split('/').filter(|s| !s.is_empty()));
            path.extend(segments);
        }
        Ok(url)
    }
}

fn session_value(instance_id: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(instance_id).map_err(|_| {
        ClientError::InvalidUrl(format!(
            "instance id is not a valid header value: {instance_id}"
        ))
    })
}
