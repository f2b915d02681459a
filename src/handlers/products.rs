//! Product handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::{ApiJson, ProductId};
use crate::response::ListEnvelope;
use crate::service::{CreateProductRequest, ListFilter, UpdateProductRequest};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

/// Replace a storage error with a short client message after logging the cause.
/// Client-facing errors (not found, bad request) pass through.
fn storage_failure(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| match err {
        AppError::NotFound(_) | AppError::BadRequest(_) | AppError::Validation(_) => err,
        other => {
            tracing::error!(error = %other, "{}", message);
            AppError::Storage(message.into())
        }
    }
}

/// Lenient query parsing: unparseable limit/offset fall back to defaults.
fn list_filter(params: &HashMap<String, String>) -> ListFilter {
    ListFilter {
        category: params.get("category").filter(|c| !c.is_empty()).cloned(),
        limit: params.get("limit").and_then(|v| v.parse().ok()),
        offset: params.get("offset").and_then(|v| v.parse().ok()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = list_filter(&params);
    let page = state
        .products
        .list(&filter)
        .await
        .map_err(storage_failure("failed to load products"))?;
    Ok(Json(ListEnvelope {
        items: page.items,
        total: page.total,
    }))
}

pub async fn read(State(state): State<AppState>, ProductId(id): ProductId) -> Result<impl IntoResponse, AppError> {
    let product = state
        .products
        .get(id)
        .await
        .map_err(storage_failure("failed to load product"))?;
    Ok(Json(product))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_product = body.into_new_product()?;
    let product = state
        .products
        .create(new_product)
        .await
        .map_err(storage_failure("failed to create product"))?;
    tracing::info!(id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    ApiJson(body): ApiJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = body.into_patch()?;
    state
        .products
        .update(id, &patch)
        .await
        .map_err(storage_failure("failed to update product"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(State(state): State<AppState>, ProductId(id): ProductId) -> Result<impl IntoResponse, AppError> {
    state
        .products
        .delete(id)
        .await
        .map_err(storage_failure("failed to delete product"))?;
    tracing::info!(id, "product hidden");
    Ok(StatusCode::NO_CONTENT)
}
