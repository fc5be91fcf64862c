pub mod choikini;
pub use self::choikini::{all_choikini, register_choikini, user_choikini};

pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

// common functions for the handlers
use std::time::UNIX_EPOCH;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use tracing::error;

use super::hal::Hal;
use crate::auth::Error;

/// Header carrying the session token for non-login operations.
pub const TOKEN_HEADER: &str = "x-choikini-token";

/// Header naming the caller for operations without a user path segment.
pub const USER_HEADER: &str = "x-choikini-user";

// axum handler for the index route
pub async fn index() -> impl IntoResponse {
    "Hello choikini World!"
}

pub(crate) fn extract_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Map a core failure onto a status and an NG envelope.
///
/// `UserNotFound` and `InvalidCredentials` share one detail string so the
/// response never reveals which occurred; the audit log already did.
pub(crate) fn failure_response(self_href: &str, err: &Error) -> Response {
    let (status, detail) = match err {
        Error::UserNotFound | Error::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "login failed")
        }
        Error::TokenPersistConflict => (StatusCode::CONFLICT, "login failed, retry"),
        Error::SessionInvalid => (StatusCode::UNAUTHORIZED, "unauthorized"),
        Error::InsufficientPrivilege => (StatusCode::FORBIDDEN, "forbidden"),
        Error::UnsupportedAlgorithm(_) | Error::StoreUnavailable(_) => {
            error!("request failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    };

    (status, Json(Hal::ng(self_href, detail))).into_response()
}

pub(crate) fn now_unix() -> i64 {
    UNIX_EPOCH
        .elapsed()
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}
