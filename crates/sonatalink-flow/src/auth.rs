//! Hub authentication
//!
//! Connects a client to the hub and waits for the user to approve the
//! pairing on the hub itself. The token is polled every [`POLL_INTERVAL`]
//! until it appears or [`AUTH_TIMEOUT`] elapses; the client is stopped on
//! every exit path.

use sonatalink_client::{AppInfo, ClientError, Connect, HubClient};
use sonatalink_core::AuthToken;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Ceiling on how long a pairing attempt may wait for approval
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Delay between token checks
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Authentication failures, by kind
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("pairing was not approved within {} seconds", AUTH_TIMEOUT.as_secs())]
    Timeout,

    #[error("hub approved the pairing but issued no token")]
    NoToken,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result type for authentication
pub type AuthResult<T> = Result<T, AuthError>;

/// Pair with the hub at `host` and wait for a token
pub async fn authenticate<C: Connect>(
    connector: &C,
    app: &AppInfo,
    host: &str,
) -> AuthResult<AuthToken> {
    let client = connector.connect(app, None, host)?;
    info!("Waiting for pairing approval from hub at {}", host);

    let deadline = Instant::now() + AUTH_TIMEOUT;
    let raw = loop {
        match client.token() {
            Ok(Some(token)) => break token,
            Ok(None) => {}
            Err(e) => {
                client.stop();
                return Err(e.into());
            }
        }

        if Instant::now() >= deadline {
            client.stop();
            warn!(
                "Pairing with {} timed out after {} seconds",
                host,
                AUTH_TIMEOUT.as_secs()
            );
            return Err(AuthError::Timeout);
        }

        debug!("No token yet, checking again in {:?}", POLL_INTERVAL);
        sleep(POLL_INTERVAL).await;
    };

    client.stop();
    match AuthToken::new(raw) {
        Some(token) => {
            info!("Hub at {} issued a token", host);
            Ok(token)
        }
        None => Err(AuthError::NoToken),
    }
}
