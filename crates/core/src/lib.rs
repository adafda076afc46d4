//! Domain layer for the hive marketplace.
//!
//! Holds everything that does not touch the database: the error taxonomy,
//! shared type aliases, the image payload codec and on-disk image store,
//! search mode selection, and the password-hashing collaborator seam.

pub mod auth;
pub mod error;
pub mod image_store;
pub mod search;
pub mod types;
