//! Authentication and session-token core.
//!
//! `credential` derives salted hashes and tokens, `authenticator` performs
//! login, `guard` wraps authenticated operations with the logoff-on-exit
//! discipline, and `policy` classifies access levels.

pub mod authenticator;
pub mod credential;
pub mod error;
pub mod guard;
pub mod policy;

pub use self::authenticator::{login, AuthConfig};
pub use self::error::Error;
pub use self::guard::{resolve_session, run_authenticated};
