//! Router assembly and the request-processing stages wrapped around it.

pub mod common;
pub mod products;

pub use common::common_routes;
pub use products::{api_routes, protected_routes, public_routes};

use crate::error::ErrorBody;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS for the listed origins, or `None` when no origin is configured.
pub fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true),
    )
}

fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal error".into(),
        }),
    )
        .into_response()
}

/// Full application: `/api` plus common routes, wrapped (outermost first) in
/// panic recovery, request tracing and, when origins are configured, CORS.
pub fn app_router(state: AppState, allowed_origins: &[String]) -> Router {
    let mut app = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state));
    if let Some(cors) = cors_layer(allowed_origins) {
        app = app.layer(cors);
    }
    app.layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}
