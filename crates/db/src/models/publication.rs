//! Publication entity model and DTOs.

use hive_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full publication row from the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Publication {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub vendor_id: DbId,
    /// Path relative to the image store root; `None` when there is no image.
    pub image_path: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Publication joined with its vendor's display name.
///
/// `vendor_name` is `None` when the vendor row no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PublicationListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub publication: Publication,
    pub vendor_name: Option<String>,
}

/// DTO for creating a publication. The image travels separately as an
/// encoded payload and is turned into `image_path` by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePublication {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub vendor_id: DbId,
    pub phone: Option<String>,
    pub location: Option<String>,
}
