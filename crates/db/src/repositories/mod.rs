//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&DbPool` as the first argument.

pub mod publication_repo;
pub mod search_repo;
pub mod vendor_repo;

pub use publication_repo::PublicationRepo;
pub use search_repo::SearchRepo;
pub use vendor_repo::VendorRepo;
