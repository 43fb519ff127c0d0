//! Client error types

use thiserror::Error;

/// Errors surfaced by a hub client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach hub: {0}")]
    Connect(String),

    #[error("transport failure while polling hub: {0}")]
    Transport(String),

    #[error("unexpected client failure: {0}")]
    Other(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
