pub mod health;
pub mod publications;
pub mod vendors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /publications                     list, create
/// /publications/search              search (?q=&mode=)
/// /publications/{id}                get, partial update, delete
///
/// /vendors                          list, register
/// /vendors/login                    login
/// /vendors/{id}                     get, partial update, delete
/// /vendors/{id}/publications        publications of one vendor
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/publications", publications::router())
        .nest("/vendors", vendors::router())
}
