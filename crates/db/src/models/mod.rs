//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//!
//! Partial updates go through [`crate::update::FieldSet`] instead of an
//! all-`Option` DTO so the caller's exact column set is preserved.

pub mod publication;
pub mod vendor;
