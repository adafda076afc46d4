//! Vendor entity model and DTOs.

use hive_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vendor row as exposed to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Vendor {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
}

/// Full vendor row including the password hash.
///
/// Only used for the login check; convert with [`VendorCredentials::into_vendor`]
/// before handing anything back to a caller.
#[derive(Clone, FromRow)]
pub struct VendorCredentials {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
}

impl VendorCredentials {
    /// Drop the password hash.
    pub fn into_vendor(self) -> Vendor {
        Vendor {
            id: self.id,
            name: self.name,
            email: self.email,
            bio: self.bio,
        }
    }
}

impl std::fmt::Debug for VendorCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorCredentials")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("bio", &self.bio)
            .finish()
    }
}

/// DTO for registering a vendor. `password_hash` is already hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVendor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
}
