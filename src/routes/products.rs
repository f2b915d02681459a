//! `/api` routes: public reads, admin writes, uploads, uploaded files.

use crate::handlers::{products, upload};
use crate::middleware::require_admin;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::services::ServeDir;

pub fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/:id", get(products::read))
        .with_state(state)
}

/// Write routes behind the admin token. The guard also wraps the method fallback, so OPTIONS reaches it.
pub fn protected_routes(state: AppState) -> Router {
    Router::new()
        .route("/products", post(products::create))
        .route("/products/:id", patch(products::update).delete(products::delete))
        .route("/upload", post(upload::upload).layer(DefaultBodyLimit::disable()))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
}

/// Everything mounted under `/api`, including static files from the upload dir.
pub fn api_routes(state: AppState) -> Router {
    let files = ServeDir::new(state.upload_dir.as_path());
    public_routes(state.clone())
        .merge(protected_routes(state))
        .nest_service("/files", files)
}
