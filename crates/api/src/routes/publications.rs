//! Route definitions for the `/publications` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::publication;
use crate::state::AppState;

/// Routes mounted at `/publications`.
///
/// ```text
/// GET    /          -> list_publications
/// POST   /          -> create_publication
/// GET    /search    -> search_publications
/// GET    /{id}      -> get_publication
/// PATCH  /{id}      -> update_publication
/// DELETE /{id}      -> delete_publication
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(publication::list_publications).post(publication::create_publication),
        )
        .route("/search", get(publication::search_publications))
        .route(
            "/{id}",
            get(publication::get_publication)
                .patch(publication::update_publication)
                .delete(publication::delete_publication),
        )
}
