//! Admin bearer-token guard for write routes. Also answers CORS preflight on those routes.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const PREFLIGHT_ALLOW_HEADERS: &str = "Authorization, Content-Type, Accept";
const PREFLIGHT_ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, AppError> {
    if request.method() == Method::OPTIONS {
        return Ok(preflight_response(request.headers()));
    }
    check_bearer(request.headers(), &state.admin_token)?;
    Ok(next.run(request).await)
}

/// `Authorization: Bearer <token>`; scheme is case-insensitive, token must match exactly.
pub fn check_bearer(headers: &HeaderMap, admin_token: &str) -> Result<(), AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing authorization".into()))?;
    let invalid = || AppError::Unauthorized("invalid token".into());
    let value = value.to_str().map_err(|_| invalid())?;
    let (scheme, token) = value.split_once(' ').ok_or_else(invalid)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token != admin_token {
        return Err(invalid());
    }
    Ok(())
}

fn preflight_response(headers: &HeaderMap) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let out = response.headers_mut();
    if let Some(origin) = headers.get(header::ORIGIN) {
        out.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    }
    out.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(PREFLIGHT_ALLOW_HEADERS),
    );
    out.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(PREFLIGHT_ALLOW_METHODS),
    );
    out.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    response
}
