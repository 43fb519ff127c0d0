//! Flow-level error codes
//!
//! Every failure is mapped to a user-visible code and redisplayed on the
//! current form; nothing aborts the wizard.

use crate::auth::AuthError;
use sonatalink_client::ClientError;

/// Error annotation shown on a redisplayed form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Hub unreachable, or pairing timed out
    CannotConnect,
    /// Pairing finished without a usable token
    InvalidAuth,
    /// A failure the flow cannot classify
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CannotConnect => "cannot_connect",
            ErrorCode::InvalidAuth => "invalid_auth",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&AuthError> for ErrorCode {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::Timeout => ErrorCode::CannotConnect,
            AuthError::NoToken => ErrorCode::InvalidAuth,
            AuthError::Client(ClientError::Connect(_)) => ErrorCode::CannotConnect,
            AuthError::Client(ClientError::Transport(_)) => ErrorCode::CannotConnect,
            AuthError::Client(ClientError::Other(_)) => ErrorCode::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_platform_strings() {
        assert_eq!(ErrorCode::CannotConnect.as_str(), "cannot_connect");
        assert_eq!(ErrorCode::InvalidAuth.as_str(), "invalid_auth");
        assert_eq!(ErrorCode::Unknown.as_str(), "unknown");
    }

    #[test]
    fn test_auth_errors_map_to_codes() {
        assert_eq!(
            ErrorCode::from(&AuthError::Timeout),
            ErrorCode::CannotConnect
        );
        assert_eq!(ErrorCode::from(&AuthError::NoToken), ErrorCode::InvalidAuth);
        assert_eq!(
            ErrorCode::from(&AuthError::Client(ClientError::Connect("x".to_string()))),
            ErrorCode::CannotConnect
        );
        assert_eq!(
            ErrorCode::from(&AuthError::Client(ClientError::Transport("x".to_string()))),
            ErrorCode::CannotConnect
        );
        assert_eq!(
            ErrorCode::from(&AuthError::Client(ClientError::Other("x".to_string()))),
            ErrorCode::Unknown
        );
    }
}
