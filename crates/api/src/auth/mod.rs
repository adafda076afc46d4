//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification, and the
//!   [`SecretHasher`](hive_core::auth::SecretHasher) implementation wired
//!   into [`AppState`](crate::state::AppState).

pub mod password;
