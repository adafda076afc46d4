use std::sync::Arc;

use hive_core::auth::SecretHasher;
use hive_core::image_store::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hive_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Publication image files.
    pub images: Arc<ImageStore>,
    /// Password hashing collaborator.
    pub hasher: Arc<dyn SecretHasher>,
}
