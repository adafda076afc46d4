//! Handlers for the `/vendors` resource (registration, login, CRUD).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hive_core::error::CoreError;
use hive_core::types::DbId;
use hive_db::models::vendor::CreateVendor;
use hive_db::repositories::{PublicationRepo, VendorRepo};
use hive_db::update::{FieldSet, VendorColumn};
use indexmap::IndexMap;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::validate_password_strength;
use crate::error::{AppError, AppResult};
use crate::handlers::{require_text, run_blocking, run_to_completion};
use crate::response::{Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /vendors`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterVendorRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

/// Request body for `POST /vendors/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/vendors
pub async fn list_vendors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let vendors = VendorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: vendors }))
}

/// GET /api/v1/vendors/{id}
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vendor = VendorRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: vendor }))
}

/// POST /api/v1/vendors
///
/// Register a vendor. Responds 201 with the new id, or 400 when the email
/// is already registered.
pub async fn register_vendor(
    State(state): State<AppState>,
    Json(input): Json<RegisterVendorRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    require_text("name", &input.name)?;
    validate_password_strength(&input.password, state.config.min_password_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hasher = state.hasher.clone();
    let password = input.password;
    let password_hash = run_blocking(move || hasher.hash(&password)).await?;

    let record = CreateVendor {
        name: input.name,
        email: input.email,
        password_hash,
        bio: input.bio,
    };
    let pool = state.pool.clone();
    let id = run_to_completion(async move {
        VendorRepo::create(&pool, &record)
            .await
            .map_err(AppError::from)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: Created { id } })))
}

/// POST /api/v1/vendors/login
///
/// Check email and password. Unknown email and wrong password produce the
/// same 400 response and never include vendor data.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let credentials = VendorRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidCredentials))?;

    let hasher = state.hasher.clone();
    let password = input.password;
    let digest = credentials.password_hash.clone();
    let valid = run_blocking(move || hasher.verify(&password, &digest)).await?;

    if !valid {
        tracing::info!(vendor_id = credentials.id, "Login rejected");
        return Err(AppError::Core(CoreError::InvalidCredentials));
    }

    tracing::info!(vendor_id = credentials.id, "Vendor logged in");
    Ok(Json(DataResponse {
        data: credentials.into_vendor(),
    }))
}

/// PATCH /api/v1/vendors/{id}
///
/// Body is an object of column -> new value; only the supplied columns
/// change. Responds with the updated vendor.
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<IndexMap<String, serde_json::Value>>,
) -> AppResult<impl IntoResponse> {
    let fields = FieldSet::<VendorColumn>::from_json(body)?;

    let pool = state.pool.clone();
    let vendor = run_to_completion(async move {
        VendorRepo::update(&pool, id, &fields).await?;
        VendorRepo::find_by_id(&pool, id)
            .await
            .map_err(AppError::from)
    })
    .await?;

    Ok(Json(DataResponse { data: vendor }))
}

/// DELETE /api/v1/vendors/{id}
///
/// The vendor's publications stay in place.
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pool = state.pool.clone();
    let affected = run_to_completion(async move {
        VendorRepo::delete(&pool, id)
            .await
            .map_err(AppError::from)
    })
    .await?;

    if affected == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Vendor",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/vendors/{id}/publications
pub async fn list_vendor_publications(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let publications = PublicationRepo::list_by_vendor(&state.pool, id).await?;
    Ok(Json(DataResponse { data: publications }))
}
