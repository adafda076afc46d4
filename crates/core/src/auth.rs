//! Password-hashing collaborator seam.
//!
//! Repositories only ever store and hand back digests; producing and
//! checking them is delegated to whatever implements [`SecretHasher`]
//! (the API crate wires in Argon2id).

use crate::error::CoreError;

/// One-way hashing capability for vendor passwords.
pub trait SecretHasher: Send + Sync {
    /// Produce a self-describing digest for `secret`.
    fn hash(&self, secret: &str) -> Result<String, CoreError>;

    /// Check `secret` against a digest previously produced by [`hash`](Self::hash).
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only when the digest itself is
    /// unusable.
    fn verify(&self, secret: &str, digest: &str) -> Result<bool, CoreError>;
}
