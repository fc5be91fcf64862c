//! In-memory directory for tests and database-less local runs.

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::{ChoikiniEntry, UserDirectory, UserId, UserRecord};
use crate::auth::Error;

/// Mutex-over-map implementation of [`UserDirectory`].
///
/// Same conditional-update semantics as the Postgres directory: each write
/// checks its precondition and reports the matched count under one lock.
#[derive(Default)]
pub struct MemoryDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
    entries: Mutex<HashMap<UserId, Vec<ChoikiniEntry>>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record. Registration is out of band, so tests and local runs
    /// insert users directly.
    pub async fn insert_user(&self, record: UserRecord) {
        let mut users = self.users.lock().await;
        users.insert(record.name.clone(), record);
    }

    /// Current token value for a user, for state assertions in tests.
    pub async fn token_of(&self, name: &str) -> Option<String> {
        let users = self.users.lock().await;
        users.get(name).map(|record| record.token.clone())
    }
}

impl UserDirectory for MemoryDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, Error> {
        let users = self.users.lock().await;
        Ok(users.get(name).cloned())
    }

    async fn find_by_name_and_token(
        &self,
        name: &str,
        token: &str,
    ) -> Result<Option<UserRecord>, Error> {
        if token.is_empty() {
            return Ok(None);
        }
        let users = self.users.lock().await;
        Ok(users
            .get(name)
            .filter(|record| record.token == token)
            .cloned())
    }

    async fn update_token(
        &self,
        id: UserId,
        name: &str,
        expected_password_hash: &str,
        new_token: &str,
    ) -> Result<u64, Error> {
        let mut users = self.users.lock().await;
        match users.get_mut(name) {
            Some(record) if record.id == id && record.password_hash == expected_password_hash => {
                record.token = new_token.to_string();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn clear_token(&self, name: &str, token: &str) -> Result<u64, Error> {
        if token.is_empty() {
            return Ok(0);
        }
        let mut users = self.users.lock().await;
        match users.get_mut(name) {
            Some(record) if record.token == token => {
                record.token = String::new();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, Error> {
        let users = self.users.lock().await;
        let mut records: Vec<UserRecord> = users.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn append_entry(&self, user_id: UserId, entry: &ChoikiniEntry) -> Result<(), Error> {
        let mut entries = self.entries.lock().await;
        entries.entry(user_id).or_default().push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, user_id: UserId) -> Result<Vec<ChoikiniEntry>, Error> {
        let entries = self.entries.lock().await;
        Ok(entries.get(&user_id).cloned().unwrap_or_default())
    }
}
