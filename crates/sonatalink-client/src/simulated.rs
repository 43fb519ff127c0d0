//! Scripted hub for dry runs and tests
//!
//! Grants or withholds a token on a fixed schedule so the setup flow can be
//! exercised end to end without a real hub. Implements no vendor protocol.

use crate::api::{AppInfo, Connect, HubClient};
use crate::error::{ClientError, ClientResult};
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// What the simulated hub does with a pairing request
#[derive(Debug, Clone)]
enum Script {
    /// Issue `token` once `delay` has elapsed after connecting
    Grant { token: String, delay: Duration },
    /// Never issue a token
    Silent,
    /// Fail at connect time
    Refuse,
}

/// Connector that produces scripted hub clients
#[derive(Debug, Clone)]
pub struct SimulatedHub {
    script: Script,
}

impl SimulatedHub {
    /// Hub that approves the pairing after `delay`
    pub fn grants(token: impl Into<String>, delay: Duration) -> Self {
        Self {
            script: Script::Grant {
                token: token.into(),
                delay,
            },
        }
    }

    /// Hub that never approves the pairing
    pub fn silent() -> Self {
        Self {
            script: Script::Silent,
        }
    }

    /// Hub that cannot be reached at all
    pub fn refusing() -> Self {
        Self {
            script: Script::Refuse,
        }
    }
}

impl Connect for SimulatedHub {
    type Client = SimulatedClient;

    fn connect(
        &self,
        app: &AppInfo,
        _token_store: Option<&Path>,
        host: &str,
    ) -> ClientResult<SimulatedClient> {
        if matches!(self.script, Script::Refuse) {
            return Err(ClientError::Connect(format!(
                "no hub reachable at {}",
                host
            )));
        }

        debug!(
            "Simulated hub at {} accepted pairing request from '{}'",
            host, app.display_name
        );
        Ok(SimulatedClient {
            script: self.script.clone(),
            connected_at: Instant::now(),
        })
    }
}

/// Client handle produced by [`SimulatedHub`]
#[derive(Debug)]
pub struct SimulatedClient {
    script: Script,
    connected_at: Instant,
}

impl HubClient for SimulatedClient {
    fn token(&self) -> ClientResult<Option<String>> {
        match &self.script {
            Script::Grant { token, delay } if self.connected_at.elapsed() >= *delay => {
                Ok(Some(token.clone()))
            }
            _ => Ok(None),
        }
    }

    fn stop(self) {
        debug!("Simulated hub client stopped");
    }
}
