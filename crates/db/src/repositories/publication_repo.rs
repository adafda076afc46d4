//! Repository for the `posts` table.
//!
//! Publication rows own at most one image file in the [`ImageStore`]. Every
//! write keeps this invariant: a row is never left pointing at a file that
//! does not exist.
//!
//! - create: write file, insert row; a failed insert removes the new file.
//! - update with image: write new file, update row, then remove the old file;
//!   a failed update removes the new file and leaves the old one untouched.
//! - delete: delete row, then remove its file.
//!
//! Removing a file that is no longer referenced is best-effort once the row
//! change has been committed: a failure is logged and does not fail the call.

use hive_core::error::CoreError;
use hive_core::image_store::{ImagePayload, ImageStore};
use hive_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::publication::{CreatePublication, Publication, PublicationListing};
use crate::update::{FieldSet, FieldValue, PublicationColumn};
use crate::DbPool;

const TABLE: &str = "posts";

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, name, description, category, vendor_id, image_path, phone, location";

/// Publication columns plus the vendor display name, as read into
/// [`PublicationListing`]. Expects `posts p` joined with `vendedores v`.
const LISTING_COLUMNS: &str = "\
    p.id, p.name, p.description, p.category, p.vendor_id, p.image_path, \
    p.phone, p.location, v.name AS vendor_name";

/// How a listing query reaches the vendor row.
#[derive(Debug, Clone, Copy)]
pub(crate) enum VendorJoin {
    /// Keep publications whose vendor is gone (`vendor_name` is `NULL`).
    Left,
    /// Drop publications without a resolvable vendor.
    Inner,
}

/// `SELECT <listing columns> FROM posts p <join> vendedores v ...`.
/// Callers append their own `WHERE` / `ORDER BY`.
pub(crate) fn listing_select(join: VendorJoin) -> String {
    let join = match join {
        VendorJoin::Left => "LEFT JOIN",
        VendorJoin::Inner => "INNER JOIN",
    };
    format!("SELECT {LISTING_COLUMNS} FROM posts p {join} vendedores v ON p.vendor_id = v.id")
}

/// Provides CRUD operations for publications and their image files.
pub struct PublicationRepo;

impl PublicationRepo {
    /// List every publication with its vendor name, including publications
    /// whose vendor no longer exists.
    pub async fn list(pool: &DbPool) -> RepoResult<Vec<PublicationListing>> {
        let query = format!("{} ORDER BY p.id", listing_select(VendorJoin::Left));
        let rows = sqlx::query_as::<_, PublicationListing>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Find a publication by id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> RepoResult<Option<Publication>> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = ?");
        let row = sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// List all publications of one vendor.
    pub async fn list_by_vendor(pool: &DbPool, vendor_id: DbId) -> RepoResult<Vec<Publication>> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} WHERE vendor_id = ? ORDER BY id");
        let rows = sqlx::query_as::<_, Publication>(&query)
            .bind(vendor_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Insert a publication, storing `image` first if one is supplied.
    ///
    /// The image key is `<vendor_id>-<unixMillis>`. Returns the new id.
    pub async fn create(
        pool: &DbPool,
        images: &ImageStore,
        input: &CreatePublication,
        image: Option<&str>,
    ) -> RepoResult<DbId> {
        require_text("name", &input.name)?;
        require_text("description", &input.description)?;

        let payload = image.map(ImagePayload::parse).transpose()?;
        let image_path = match &payload {
            Some(payload) => Some(
                images
                    .save(payload, &ImageStore::image_key(input.vendor_id))
                    .await?,
            ),
            None => None,
        };

        let query = format!(
            "INSERT INTO {TABLE} \
             (name, description, category, vendor_id, image_path, phone, location) \
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        );
        let inserted = sqlx::query(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.vendor_id)
            .bind(&image_path)
            .bind(&input.phone)
            .bind(&input.location)
            .execute(pool)
            .await;

        match inserted {
            Ok(result) => {
                let id = result.last_insert_rowid();
                tracing::info!(
                    publication_id = id,
                    vendor_id = input.vendor_id,
                    image_path = image_path.as_deref(),
                    "Publication created"
                );
                Ok(id)
            }
            Err(e) => {
                if let Some(path) = &image_path {
                    remove_unreferenced(images, path, "insert failed").await;
                }
                Err(e.into())
            }
        }
    }

    /// Delete a publication and its image file.
    ///
    /// Fails with `NotFound` if no row existed. When the row had no image,
    /// the filesystem is not touched.
    pub async fn delete(pool: &DbPool, images: &ImageStore, id: DbId) -> RepoResult<()> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::not_found("Publication", id))?;

        let query = format!("DELETE FROM {TABLE} WHERE id = ?");
        let affected = sqlx::query(&query)
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(RepoError::not_found("Publication", id));
        }

        if let Some(path) = &existing.image_path {
            remove_unreferenced(images, path, "publication deleted").await;
        }

        tracing::info!(publication_id = id, "Publication deleted");
        Ok(())
    }

    /// Apply a partial update, optionally replacing the image.
    ///
    /// Only the columns in `fields` change (plus `image_path` when `image` is
    /// supplied). Fails with `NotFound` if no row matched; an absent row is
    /// reported before an empty `fields` or a malformed `image`.
    pub async fn update(
        pool: &DbPool,
        images: &ImageStore,
        id: DbId,
        mut fields: FieldSet<PublicationColumn>,
        image: Option<&str>,
    ) -> RepoResult<()> {
        let Some(encoded) = image else {
            if fields.is_empty() {
                Self::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| RepoError::not_found("Publication", id))?;
            }
            let affected = fields
                .build_update(TABLE, "id", id)?
                .build()
                .execute(pool)
                .await?
                .rows_affected();
            if affected == 0 {
                return Err(RepoError::not_found("Publication", id));
            }
            tracing::info!(
                publication_id = id,
                columns = ?fields.columns().collect::<Vec<_>>(),
                "Publication updated"
            );
            return Ok(());
        };

        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::not_found("Publication", id))?;
        let payload = ImagePayload::parse(encoded)?;

        let vendor_id = match fields.get(PublicationColumn::VendorId) {
            Some(FieldValue::Integer(vendor_id)) => *vendor_id,
            _ => existing.vendor_id,
        };

        let new_path = images
            .save(&payload, &ImageStore::image_key(vendor_id))
            .await?;

        if let Err(e) = fields.set(PublicationColumn::ImagePath, new_path.as_str()) {
            remove_unreferenced(images, &new_path, "update rejected").await;
            return Err(e.into());
        }

        let outcome = match fields.build_update(TABLE, "id", id) {
            Ok(mut query) => query
                .build()
                .execute(pool)
                .await
                .map(|r| r.rows_affected())
                .map_err(RepoError::from),
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(affected) if affected > 0 => {
                if let Some(old_path) = existing.image_path.as_deref() {
                    if old_path != new_path {
                        remove_unreferenced(images, old_path, "image replaced").await;
                    }
                }
                tracing::info!(
                    publication_id = id,
                    image_path = %new_path,
                    columns = ?fields.columns().collect::<Vec<_>>(),
                    "Publication updated with new image"
                );
                Ok(())
            }
            Ok(_) => {
                remove_unreferenced(images, &new_path, "row vanished before update").await;
                Err(RepoError::not_found("Publication", id))
            }
            Err(e) => {
                remove_unreferenced(images, &new_path, "update failed").await;
                Err(e)
            }
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!(
            "Publication '{field}' must not be empty"
        )))
    } else {
        Ok(())
    }
}

/// Remove an image file that no row references any more.
async fn remove_unreferenced(images: &ImageStore, path: &str, reason: &'static str) {
    if let Err(e) = images.delete(path).await {
        tracing::warn!(
            image_path = path,
            reason,
            error = %e,
            "Could not remove unreferenced image"
        );
    }
}
