use thiserror::Error;

/// Failure kinds surfaced by the auth/session core.
///
/// `UserNotFound` and `InvalidCredentials` are logged distinctly for audit
/// but the HTTP layer reports both as the same login failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token update conflict")]
    TokenPersistConflict,
    #[error("session invalid")]
    SessionInvalid,
    #[error("insufficient privilege")]
    InsufficientPrivilege,
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),
}

impl Error {
    /// Wrap a transport-level store failure.
    pub fn store(err: impl Into<anyhow::Error>) -> Self {
        Self::StoreUnavailable(err.into())
    }
}
