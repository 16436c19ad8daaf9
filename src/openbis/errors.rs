use reqwest::StatusCode;

/// Error type for openBIS API operations.
///
/// The variants fall into three user-facing buckets: transport problems
/// (`Transport`, `Http`, `Rpc`), malformed server output (`UnexpectedShape`)
/// and everything the caller can act on (`ServiceNotFound`, `NotAuthenticated`,
/// `Integrity`, `Config`).
#[derive(Debug, thiserror::Error)]
pub enum OpenbisError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("openBIS RPC error: {message}")]
    Rpc { code: Option<i64>, message: String },

    #[error("unexpected feedback from server: {0}")]
    UnexpectedShape(String),

    #[error("aggregation service '{0}' not found on the server")]
    ServiceNotFound(String),

    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl OpenbisError {
    /// True for failures of the request/response plumbing itself, as opposed
    /// to well-formed answers the server chose to give.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OpenbisError::Transport(_) | OpenbisError::Http { .. } | OpenbisError::Rpc { .. }
        )
    }
}
