//! Client for the remote step-generation endpoint.
//!
//! Contract: `POST {base}/api/{algorithm}` with an [`Input`] body, answered
//! by a [`StepsPayload`]. The returned steps are re-validated locally before
//! they become a [`Trace`].

use std::time::Duration;

use algoviz_core::{AlgorithmId, Input, Outcome, Step, Trace, TraceError};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// Response body of the step-generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsPayload {
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    pub outcome: Outcome,
}

impl StepsPayload {
    pub fn from_trace(trace: &Trace) -> Self {
        StepsPayload {
            steps: trace.steps().to_vec(),
            found: trace.outcome().found(),
            outcome: trace.outcome().clone(),
        }
    }

    /// Validates the steps against `algorithm`'s family.
    pub fn into_trace(self, algorithm: AlgorithmId) -> Result<Trace, TraceError> {
        Trace::from_parts(algorithm, self.steps, self.outcome)
    }
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RemoteClient {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, algorithm: AlgorithmId) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), algorithm)
    }

    /// Requests a trace for `algorithm` on `input`.
    pub async fn fetch(&self, algorithm: AlgorithmId, input: &Input) -> Result<Trace, RemoteError> {
        let response = self
            .http
            .post(self.endpoint(algorithm))
            .json(input)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: StepsPayload = serde_json::from_str(&body)?;
        let trace = payload.into_trace(algorithm)?;
        tracing::debug!(%algorithm, steps = trace.len(), "remote trace accepted");
        Ok(trace)
    }
}
