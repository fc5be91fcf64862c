//! Session authenticator: password verification and token issuance.

use std::time::UNIX_EPOCH;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use super::credential;
use super::error::Error;
use crate::store::{SessionView, UserDirectory};

/// Algorithm names used to derive hashes and tokens.
///
/// Names are resolved by the credential codec at call time, so a
/// misconfigured name surfaces as `UnsupportedAlgorithm` on the first login.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    hash_algorithm: String,
    crypto_algorithm: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hash_algorithm: "sha256".to_string(),
            crypto_algorithm: "sha256".to_string(),
        }
    }

    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: String) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_crypto_algorithm(mut self, algorithm: String) -> Self {
        self.crypto_algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn hash_algorithm(&self) -> &str {
        &self.hash_algorithm
    }

    #[must_use]
    pub fn crypto_algorithm(&self) -> &str {
        &self.crypto_algorithm
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify `(name, password)` against the directory and mint a fresh session
/// token.
///
/// The salted hash is re-derived from the stored salt on every call rather
/// than trusting a cached digest, and the token is persisted with a
/// conditional update keyed on the unchanged password hash. A concurrent
/// password change between read and write fails with
/// [`Error::TokenPersistConflict`] instead of issuing a token against stale
/// credentials.
pub async fn login<D: UserDirectory>(
    directory: &D,
    config: &AuthConfig,
    name: &str,
    password: &SecretString,
) -> Result<SessionView, Error> {
    if name.is_empty() {
        warn!("login rejected: empty user name");
        return Err(Error::UserNotFound);
    }
    if password.expose_secret().is_empty() {
        warn!(user = name, "login rejected: empty password");
        return Err(Error::InvalidCredentials);
    }

    let Some(record) = directory.find_by_name(name).await? else {
        // Logged distinctly from a password mismatch for audit; the response
        // shaping upstream conflates the two.
        warn!(user = name, "login failed: unknown user");
        return Err(Error::UserNotFound);
    };

    let derived_salt_digest = credential::hash(config.hash_algorithm(), &record.password_salt)?;
    let candidate_hash = credential::encrypt(
        config.crypto_algorithm(),
        &derived_salt_digest,
        password.expose_secret(),
    )?;

    if candidate_hash != record.password_hash {
        warn!(user = name, "login failed: password mismatch");
        return Err(Error::InvalidCredentials);
    }

    let token = mint_token(config, name)?;
    let matched = directory
        .update_token(record.id, name, &candidate_hash, &token)
        .await?;
    if matched == 0 {
        warn!(user = name, "login failed: token persist conflict");
        return Err(Error::TokenPersistConflict);
    }

    info!(user = name, "login succeeded");
    Ok(SessionView {
        id: record.id,
        name: record.name,
        token,
        access: record.access,
    })
}

/// Derive a fresh token from a throwaway salt digest keyed over the login
/// timestamp and user name.
fn mint_token(config: &AuthConfig, name: &str) -> Result<String, Error> {
    let seed = credential::hash(config.hash_algorithm(), &credential::generate_salt())?;
    let now = UNIX_EPOCH.elapsed().map_or(0, |elapsed| elapsed.as_secs());
    credential::encrypt(config.crypto_algorithm(), &seed, &format!("{now}{name}"))
}
