// ABOUTME: Error type shared by all remote resource operations.
// ABOUTME: Classifies the transient "unrecognized client token" failure for retry.

/// Error code returned while a freshly minted access key has not propagated yet.
pub const INVALID_CLIENT_TOKEN_CODE: &str = "InvalidClientTokenId";

/// Error name returned by some services for the same propagation delay.
pub const UNRECOGNIZED_CLIENT_NAME: &str = "UnrecognizedClientException";

/// Errors from remote resource operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The remote service rejected the call.
    #[error("{}", describe_service(.code, .name, .message))]
    Service {
        code: Option<String>,
        name: Option<String>,
        message: String,
    },

    /// The bridge process could not be started.
    #[error("failed to spawn bridge: {0}")]
    Spawn(#[source] std::io::Error),

    /// The bridge answered with something that does not decode.
    #[error("bridge protocol error: {0}")]
    Protocol(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Credentials not yet recognized by the remote API. Safe to retry.
    TransientAuth,
    /// Any other service-side rejection.
    Service,
    /// Local failure to reach or understand the bridge.
    Bridge,
}

impl RemoteError {
    /// Build a service error from its code and message.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Service {
            code: Some(code.into()),
            name: None,
            message: message.into(),
        }
    }

    /// Build a service error identified by its exception name.
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Service {
            code: None,
            name: Some(name.into()),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::Service { code, name, .. } => {
                if code.as_deref() == Some(INVALID_CLIENT_TOKEN_CODE)
                    || name.as_deref() == Some(UNRECOGNIZED_CLIENT_NAME)
                {
                    RemoteErrorKind::TransientAuth
                } else {
                    RemoteErrorKind::Service
                }
            }
            RemoteError::Spawn(_) | RemoteError::Protocol(_) => RemoteErrorKind::Bridge,
        }
    }

    /// True for the one failure the deploy loop absorbs and retries.
    pub fn is_transient_auth(&self) -> bool {
        self.kind() == RemoteErrorKind::TransientAuth
    }
}

fn describe_service(code: &Option<String>, name: &Option<String>, message: &str) -> String {
    match code.as_deref().or(name.as_deref()) {
        Some(tag) => format!("{tag}: {message}"),
        None => message.to_string(),
    }
}
