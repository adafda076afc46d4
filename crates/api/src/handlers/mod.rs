//! Request handlers, one module per resource.

pub mod publication;
pub mod vendor;

use std::future::Future;

use hive_core::error::CoreError;
use hive_core::types::DbId;
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

/// Run a write on its own task and wait for it.
///
/// Dropping the request future (client gone, timeout layer fired) does not
/// cancel the spawned task, so file and row changes always finish together.
pub(crate) async fn run_to_completion<F, T>(work: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Write task failed: {e}")))?
}

/// Run CPU-bound work (password hashing) off the async workers.
pub(crate) async fn run_blocking<F, T>(work: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Blocking task failed: {e}")))?;
    Ok(result?)
}

/// Reject an empty or whitespace-only required text field.
pub(crate) fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{field}' must not be empty"
        ))));
    }
    Ok(())
}

/// Accept an id as a JSON number or a numeric string (`7` or `"7"`).
pub(crate) fn deserialize_db_id<'de, D>(deserializer: D) -> Result<DbId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(DbId),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("expected an integer id, got '{text}'"))
        }),
    }
}
