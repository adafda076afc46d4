//! Repository for the `vendedores` table.

use hive_core::error::CoreError;
use hive_core::types::DbId;

use crate::error::{is_unique_violation, RepoError, RepoResult};
use crate::models::vendor::{CreateVendor, Vendor, VendorCredentials};
use crate::update::{FieldSet, FieldValue, VendorColumn};
use crate::DbPool;

const TABLE: &str = "vendedores";

/// Caller-facing column list (no password hash).
const COLUMNS: &str = "id, name, email, bio";

/// Column list for the login check.
const CREDENTIAL_COLUMNS: &str = "id, name, email, password_hash, bio";

/// Provides CRUD operations for vendors.
pub struct VendorRepo;

impl VendorRepo {
    /// List all vendors in insertion order.
    pub async fn list(pool: &DbPool) -> RepoResult<Vec<Vendor>> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} ORDER BY id");
        let vendors = sqlx::query_as::<_, Vendor>(&query).fetch_all(pool).await?;
        Ok(vendors)
    }

    /// Insert a new vendor and return its id.
    ///
    /// Email uniqueness is enforced by the `uq_vendedores_email` constraint;
    /// a violation is reported as [`CoreError::DuplicateEmail`].
    pub async fn create(pool: &DbPool, input: &CreateVendor) -> RepoResult<DbId> {
        let query = format!(
            "INSERT INTO {TABLE} (name, email, password_hash, bio) VALUES (?, ?, ?, ?)"
        );
        let result = sqlx::query(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.bio)
            .execute(pool)
            .await
            .map_err(|e| duplicate_email_or(e, &input.email))?;

        let id = result.last_insert_rowid();
        tracing::info!(vendor_id = id, "Vendor registered");
        Ok(id)
    }

    /// Find a vendor by email (case-sensitive), including the password hash.
    pub async fn find_by_email(
        pool: &DbPool,
        email: &str,
    ) -> RepoResult<Option<VendorCredentials>> {
        let query = format!("SELECT {CREDENTIAL_COLUMNS} FROM {TABLE} WHERE email = ? LIMIT 1");
        let vendor = sqlx::query_as::<_, VendorCredentials>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(vendor)
    }

    /// Find a vendor by id. Fails with `NotFound` if absent.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> RepoResult<Vendor> {
        let query = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = ?");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| RepoError::not_found("Vendor", id))
    }

    /// Delete a vendor and return the number of rows removed (`0` if absent).
    ///
    /// Publications are not cascaded: they stay in place with a dangling
    /// `vendor_id` and show up without a vendor name.
    pub async fn delete(pool: &DbPool, id: DbId) -> RepoResult<u64> {
        let query = format!("DELETE FROM {TABLE} WHERE id = ?");
        let affected = sqlx::query(&query)
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

        if affected > 0 {
            let (orphaned,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM posts WHERE vendor_id = ?")
                    .bind(id)
                    .fetch_one(pool)
                    .await?;
            tracing::info!(
                vendor_id = id,
                orphaned_publications = orphaned,
                "Vendor deleted"
            );
        }

        Ok(affected)
    }

    /// Apply a partial update. Only the columns in `fields` change.
    ///
    /// Fails with `NotFound` if no row matched and with `DuplicateEmail` if
    /// the new email belongs to another vendor. An empty `fields` is a
    /// `Validation` error, reported only once the vendor is known to exist.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        fields: &FieldSet<VendorColumn>,
    ) -> RepoResult<()> {
        if fields.is_empty() {
            Self::find_by_id(pool, id).await?;
        }
        let mut query = fields.build_update(TABLE, "id", id)?;
        let affected = query
            .build()
            .execute(pool)
            .await
            .map_err(|e| match fields.get(VendorColumn::Email) {
                Some(FieldValue::Text(email)) => duplicate_email_or(e, email),
                _ => RepoError::Database(e),
            })?
            .rows_affected();

        if affected == 0 {
            return Err(RepoError::not_found("Vendor", id));
        }

        tracing::info!(
            vendor_id = id,
            columns = ?fields.columns().collect::<Vec<_>>(),
            "Vendor updated"
        );
        Ok(())
    }
}

fn duplicate_email_or(err: sqlx::Error, email: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::Core(CoreError::DuplicateEmail(email.to_string()))
    } else {
        RepoError::Database(err)
    }
}
