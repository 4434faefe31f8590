use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaddieError {
    #[error("no credential present; save a bearer token before talking to the service")]
    Unauthenticated,

    #[error("remote service rejected the request with status {status}")]
    RemoteRejected { status: reqwest::StatusCode },

    #[error("malformed response from remote service: {0}")]
    MalformedResponse(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scan service is not running")]
    ServiceUnavailable,

    #[error("timed out waiting for a reply from the scan service")]
    RelayTimeout,

    #[error("store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CaddieError {
    /// True for the statuses that should invalidate a stored credential
    /// (consumers clear the token and ask the user to log in again).
    pub fn invalidates_credential(&self) -> bool {
        matches!(
            self,
            CaddieError::RemoteRejected { status }
                if *status == reqwest::StatusCode::UNAUTHORIZED
                    || *status == reqwest::StatusCode::FORBIDDEN
        )
    }
}

pub type Result<T> = std::result::Result<T, CaddieError>;
