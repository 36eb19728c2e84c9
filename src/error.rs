//! Error taxonomy for the authorization flow and the Web API calls built on it.
//!
//! Every network or provider failure is converted into one of these kinds at
//! the boundary of the operation that observed it, so callers can print a
//! readable status line and carry on in a logged-out mode.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No client id has been configured yet.
    #[error("no client id configured, run `spotstats client set <CLIENT_ID>` first")]
    MissingConfig,

    /// A value the token exchange depends on is gone (verifier or client id).
    #[error("missing {0}, restart the login with `spotstats login`")]
    MissingPrerequisite(&'static str),

    /// The provider redirected back with `error=...`.
    #[error("authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    #[error("token exchange failed: {status} {body}")]
    TokenExchangeFailed { status: u16, body: String },

    #[error("refresh failed: {status}")]
    RefreshFailed { status: u16 },

    #[error("not authenticated, run `spotstats login`")]
    NotAuthenticated,

    #[error("verifier length {0} is outside the allowed range 43..=128")]
    InvalidVerifierLength(usize),

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{endpoint} responded with status {status}")]
    Api { endpoint: String, status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("http error: {0}")]
    Http(reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored access token cannot be sent as a header")]
    MalformedToken,
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::Http(err)
        }
    }
}

impl AuthError {
    /// Transient failures may succeed on the next scheduled use.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Timeout | AuthError::Http(_))
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;
