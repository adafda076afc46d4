//! Route definitions for the `/vendors` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vendor;
use crate::state::AppState;

/// Routes mounted at `/vendors`.
///
/// ```text
/// GET    /                    -> list_vendors
/// POST   /                    -> register_vendor
/// POST   /login               -> login
/// GET    /{id}                -> get_vendor
/// PATCH  /{id}                -> update_vendor
/// DELETE /{id}                -> delete_vendor
/// GET    /{id}/publications   -> list_vendor_publications
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vendor::list_vendors).post(vendor::register_vendor))
        .route("/login", post(vendor::login))
        .route(
            "/{id}",
            get(vendor::get_vendor)
                .patch(vendor::update_vendor)
                .delete(vendor::delete_vendor),
        )
        .route("/{id}/publications", get(vendor::list_vendor_publications))
}
