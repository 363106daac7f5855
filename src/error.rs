//! Error taxonomy for the client core.
//!
//! ERROR HANDLING
//! ==============
//! Network-level failures are wrapped with a fixed user-facing message and
//! the original cause is discarded after logging. A 404 on a get-by-id is
//! never an error (callers get `Ok(None)`), and route-guard denials are
//! deliberate flow control, not errors. Nothing here is retried more than
//! once — the single refresh-retry in `net::fetch` is the only retry in the
//! crate.

/// Errors produced by the session, auth, and item clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request failed at the transport level.
    #[error("{0}")]
    Network(String),

    /// The refresh endpoint was unreachable or returned a non-success status.
    #[error("refresh token failed: {0}")]
    RefreshFailed(String),

    /// The access token's claim segment could not be decoded.
    #[error("token claims decode failed: {0}")]
    ClaimsDecode(String),

    /// A mutating call returned a non-success HTTP status.
    #[error("request failed: status {status}")]
    Unexpected { status: u16 },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A required configuration value is missing or unparseable.
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// Status carried by this error, when one exists.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unexpected { status } => Some(*status),
            _ => None,
        }
    }
}
