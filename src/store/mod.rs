//! User directory: the persistence collaborator owning user records and
//! choikini entries.
//!
//! Token writes are conditional: `update_token` only applies while the
//! password hash is unchanged since it was read, and `clear_token` only
//! while the presented token is still current. The matched count (0 or 1)
//! is the caller's only conflict signal; there is no in-process locking.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::policy::AccessLevel;
use crate::auth::Error;

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryDirectory;
pub use self::postgres::PgDirectory;

/// Opaque identifier assigned by the store on creation.
pub type UserId = Uuid;

/// A stored user. The salt and hash never leave the directory/authenticator.
#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub password_salt: String,
    pub password_hash: String,
    /// Current session token; empty string means "no active session".
    pub token: String,
    pub access: AccessLevel,
}

impl UserRecord {
    /// The subset of a record handed back to callers after authentication.
    #[must_use]
    pub fn session_view(&self) -> SessionView {
        SessionView {
            id: self.id,
            name: self.name.clone(),
            token: self.token.clone(),
            access: self.access,
        }
    }
}

/// Caller-facing view of an authenticated session. Never carries password
/// material.
#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub id: UserId,
    pub name: String,
    pub token: String,
    pub access: AccessLevel,
}

/// One choikini note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoikiniEntry {
    /// Registration time, unix seconds.
    pub entry_date: i64,
    pub entry: String,
}

/// A user's entries, as returned by the listing operations.
#[derive(Clone, Debug, Serialize)]
pub struct UserEntries {
    pub user: String,
    pub entries: Vec<ChoikiniEntry>,
}

/// Persistence contract consumed by the authenticator and the session guard.
///
/// Every operation may fail with [`Error::StoreUnavailable`] on transport
/// failure; nothing here retries.
pub trait UserDirectory: Send + Sync {
    /// Look up a record by unique name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, Error>> + Send;

    /// Resolve an identity for non-login operations; both fields must match
    /// exactly.
    fn find_by_name_and_token(
        &self,
        name: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, Error>> + Send;

    /// Atomically set a new token while `(id, name, password_hash)` is
    /// unchanged. Returns the matched count; 0 signals a conflict.
    fn update_token(
        &self,
        id: UserId,
        name: &str,
        expected_password_hash: &str,
        new_token: &str,
    ) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Atomically clear the token while `(name, token)` still matches.
    /// A matched count of 0 means "already logged off", not a hard error.
    fn clear_token(
        &self,
        name: &str,
        token: &str,
    ) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Full scan, used only by the administrator listing.
    fn list_all(&self) -> impl Future<Output = Result<Vec<UserRecord>, Error>> + Send;

    /// Append a choikini entry for a user.
    fn append_entry(
        &self,
        user_id: UserId,
        entry: &ChoikiniEntry,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Entries registered by one user, oldest first.
    fn entries_for(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<ChoikiniEntry>, Error>> + Send;
}
