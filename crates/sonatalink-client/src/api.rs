//! Hub client contract consumed by the setup flow
//!
//! The pairing and discovery protocol itself lives in the hub vendor's SDK.
//! The flow only needs three things from it: client construction bound to a
//! host, a repeated token accessor, and a stop operation.

use crate::error::ClientResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identity the integration presents to the hub during pairing
///
/// Shown to the user in the hub's extension-approval screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub extension_id: String,
    pub display_name: String,
    pub display_version: String,
    pub publisher: String,
    pub email: String,
    pub website: String,
}

/// Handle to a running hub client
///
/// Construction is non-blocking: the hub issues a token only once the user
/// approves the extension on the hub itself, so `token` is polled until the
/// token appears.
pub trait HubClient {
    /// Current token, if the hub has issued one yet
    fn token(&self) -> ClientResult<Option<String>>;

    /// Shut the client down and release its connection
    fn stop(self);
}

/// Factory for hub clients bound to a host
pub trait Connect {
    type Client: HubClient;

    /// Create a client for the hub at `host`
    ///
    /// `token_store` optionally points at a file the client may use to
    /// persist its token between sessions.
    fn connect(
        &self,
        app: &AppInfo,
        token_store: Option<&Path>,
        host: &str,
    ) -> ClientResult<Self::Client>;
}
