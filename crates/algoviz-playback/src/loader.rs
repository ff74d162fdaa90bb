//! Trace loading with remote-first, local-fallback semantics.

use algoviz_core::{AlgorithmId, Input, Trace};
use serde::Serialize;

use crate::config::PlaybackConfig;
use crate::error::{LoadError, RemoteError};
use crate::remote::RemoteClient;

/// Which path produced a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Remote,
    Local,
}

#[derive(Debug, Clone)]
pub struct LoadedTrace {
    pub trace: Trace,
    pub origin: Origin,
}

/// Produces traces, preferring the remote generator when one is configured.
#[derive(Debug, Clone, Default)]
pub struct TraceLoader {
    remote: Option<RemoteClient>,
}

impl TraceLoader {
    /// A loader that only uses the local adapters.
    pub fn local() -> Self {
        TraceLoader { remote: None }
    }

    pub fn with_remote(remote: RemoteClient) -> Self {
        TraceLoader {
            remote: Some(remote),
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Result<Self, RemoteError> {
        match &config.remote_url {
            Some(url) => Ok(Self::with_remote(RemoteClient::new(
                url.clone(),
                config.remote_timeout,
            )?)),
            None => Ok(Self::local()),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Loads a trace for `algorithm` on `input`.
    ///
    /// Input is validated locally first, so a [`LoadError::Invalid`] is
    /// returned whether or not a remote is configured. Any remote failure is
    /// logged and answered with the local adapter's trace.
    pub async fn load(&self, algorithm: AlgorithmId, input: &Input) -> Result<LoadedTrace, LoadError> {
        algoviz_trace::validate(algorithm, input)?;

        if let Some(remote) = &self.remote {
            match remote.fetch(algorithm, input).await {
                Ok(trace) => {
                    return Ok(LoadedTrace {
                        trace,
                        origin: Origin::Remote,
                    })
                }
                Err(err) => {
                    tracing::warn!(
                        %algorithm,
                        remote = remote.base_url(),
                        error = %err,
                        "remote step generation failed, using local adapter"
                    );
                }
            }
        }

        let trace = algoviz_trace::generate(algorithm, input)?;
        Ok(LoadedTrace {
            trace,
            origin: Origin::Local,
        })
    }
}
