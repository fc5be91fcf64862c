//! Session guard: resolve identity, run the operation, always log off.

use std::future::Future;

use tracing::{debug, warn};

use super::error::Error;
use crate::store::{SessionView, UserDirectory};

/// Resolve `(name, token)` into a session view.
///
/// Empty names or tokens never resolve. This performs no logoff; only
/// [`run_authenticated`] arms the unconditional token clear, and only after
/// a successful resolution.
pub async fn resolve_session<D: UserDirectory>(
    directory: &D,
    name: &str,
    token: &str,
) -> Result<SessionView, Error> {
    if name.is_empty() || token.is_empty() {
        return Err(Error::SessionInvalid);
    }
    let record = directory
        .find_by_name_and_token(name, token)
        .await?
        .ok_or(Error::SessionInvalid)?;
    Ok(record.session_view())
}

/// Run `op` under an authenticated session and invalidate the token on every
/// exit path.
///
/// The token is treated as a single-use credential: whatever `op` returns,
/// `clear_token(name, token)` runs afterwards. A logoff that matches nothing
/// or fails outright is logged as a warning and never replaces the
/// operation's outcome. If resolution itself fails the operation is never
/// invoked and no logoff is attempted.
pub async fn run_authenticated<D, F, Fut, T>(
    directory: &D,
    name: &str,
    token: &str,
    op: F,
) -> Result<T, Error>
where
    D: UserDirectory,
    F: FnOnce(SessionView) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let session = resolve_session(directory, name, token).await?;

    let outcome = op(session).await;

    match directory.clear_token(name, token).await {
        Ok(0) => warn!(user = name, "logoff matched no session"),
        Ok(_) => debug!(user = name, "session token cleared"),
        Err(err) => warn!(user = name, "logoff failed: {err}"),
    }

    outcome
}
