//! # Choikini (note-posting service)
//!
//! `choikini` is a small multi-user note-posting service gated by
//! username/password login. Its centerpiece is the session-token core:
//!
//! - **Salted-password verification:** the stored hash is re-derived from the
//!   per-user salt on every login, so verification always reflects the current
//!   algorithm configuration.
//! - **One-time tokens:** a login mints a fresh token and persists it with a
//!   conditional update keyed on the unchanged password hash. At most one
//!   token is valid per user; a second login overwrites the first
//!   (last-login-wins).
//! - **Guarded operations:** every authenticated operation runs inside the
//!   session guard, which resolves the caller by `(name, token)` and clears
//!   the token afterwards on every exit path. A token is good for exactly one
//!   operation.
//!
//! Token mutation correctness relies on the store's atomic conditional
//! updates, never on in-process locking. Concurrent logins race at the store
//! and the last writer wins by design.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;
