//! Handlers for the `/publications` resource and publication search.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hive_core::error::CoreError;
use hive_core::search::SearchMode;
use hive_core::types::DbId;
use hive_db::models::publication::CreatePublication;
use hive_db::repositories::{PublicationRepo, SearchRepo};
use hive_db::update::{FieldSet, PublicationColumn};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::handlers::{deserialize_db_id, run_to_completion};
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// Body key that carries an encoded image rather than a column value.
const IMAGE_KEY: &str = "image";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /publications`.
#[derive(Debug, Deserialize)]
pub struct CreatePublicationRequest {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    /// A number or a numeric string, as with `PATCH`.
    #[serde(deserialize_with = "deserialize_db_id")]
    pub vendor_id: DbId,
    /// `data:image/<type>;base64,<body>` payload.
    pub image: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Query parameters for `GET /publications/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub mode: Option<String>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/publications
///
/// Every publication with its vendor name (`null` when the vendor is gone).
pub async fn list_publications(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let publications = PublicationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: publications }))
}

/// GET /api/v1/publications/{id}
pub async fn get_publication(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let publication = PublicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id,
        }))?;
    Ok(Json(DataResponse { data: publication }))
}

/// GET /api/v1/publications/search?q=&mode=
///
/// `mode` is `publications` (default), `vendors` or `categories`; anything
/// else falls back to `publications`. A missing or blank `q` yields `[]`.
pub async fn search_publications(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let mode = SearchMode::from_param(params.mode.as_deref());
    let term = params.q.unwrap_or_default();

    let results = SearchRepo::search(&state.pool, &term, mode).await?;
    Ok(Json(DataResponse { data: results }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/publications
///
/// Responds 201 with the new id. An `image` payload is stored before the
/// row is inserted; blank `name` / `description` are rejected by the
/// repository before anything is written.
pub async fn create_publication(
    State(state): State<AppState>,
    Json(input): Json<CreatePublicationRequest>,
) -> AppResult<impl IntoResponse> {
    let record = CreatePublication {
        name: input.name,
        description: input.description,
        category: input.category,
        vendor_id: input.vendor_id,
        phone: input.phone,
        location: input.location,
    };
    let image = input.image;

    let pool = state.pool.clone();
    let images = state.images.clone();
    let id = run_to_completion(async move {
        PublicationRepo::create(&pool, &images, &record, image.as_deref())
            .await
            .map_err(AppError::from)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: Created { id } })))
}

/// PATCH /api/v1/publications/{id}
///
/// Body is an object of column -> new value; only the supplied columns
/// change. An optional `image` key replaces the stored image. Responds with
/// the updated publication.
pub async fn update_publication(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut body): Json<IndexMap<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let image = match body.shift_remove(IMAGE_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(encoded)) => Some(encoded),
        Some(_) => {
            return Err(AppError::Core(CoreError::Validation(
                "'image' must be an encoded image string".into(),
            )))
        }
    };
    let fields = FieldSet::<PublicationColumn>::from_json(body)?;

    let pool = state.pool.clone();
    let images = state.images.clone();
    let publication = run_to_completion(async move {
        PublicationRepo::update(&pool, &images, id, fields, image.as_deref()).await?;
        PublicationRepo::find_by_id(&pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Publication",
                id,
            }))
    })
    .await?;

    Ok(Json(DataResponse { data: publication }))
}

/// DELETE /api/v1/publications/{id}
///
/// Removes the row and then its image file.
pub async fn delete_publication(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pool = state.pool.clone();
    let images = state.images.clone();
    run_to_completion(async move {
        PublicationRepo::delete(&pool, &images, id)
            .await
            .map_err(AppError::from)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
