//! Shared helpers for router-level tests: an in-memory `ProductStore` and request builders.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tg_market_api::{app_router, AppError, AppState, ListFilter, NewProduct, Product, ProductPage, ProductPatch, ProductStore};
use tower::ServiceExt;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Keeps rows in insertion order; each insert gets a strictly later `created_at`.
#[derive(Default)]
pub struct InMemoryProductStore {
    rows: Mutex<Vec<Product>>,
    writes: AtomicUsize,
    fail: AtomicBool,
}

impl InMemoryProductStore {
    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every following call fail like a dropped connection.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Raw row, including hidden ones.
    pub fn row(&self, id: i64) -> Option<Product> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self, filter: &ListFilter) -> Result<ProductPage, AppError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<Product> = rows
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| filter.category.as_deref().map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(filter.effective_offset() as usize)
            .take(filter.effective_limit() as usize)
            .collect();
        Ok(ProductPage { items, total })
    }

    async fn get(&self, id: i64) -> Result<Product, AppError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.is_active)
            .cloned()
            .ok_or_else(|| AppError::NotFound("product not found".into()))
    }

    async fn create(&self, product: NewProduct) -> Result<Product, AppError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let row = product.into_product(id, base + Duration::seconds(id));
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<(), AppError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|p| p.id == id) {
            if let Some(v) = &patch.title {
                row.title = v.clone();
            }
            if let Some(v) = &patch.description {
                row.description = v.clone();
            }
            if let Some(v) = &patch.highlights {
                row.highlights = v.clone();
            }
            if let Some(v) = patch.price_ton {
                row.price_ton = v;
            }
            if let Some(v) = &patch.category {
                row.category = v.clone();
            }
            if let Some(v) = &patch.images {
                row.images = v.clone();
            }
            if let Some(v) = patch.stock {
                row.stock = v;
            }
            if let Some(v) = patch.is_active {
                row.is_active = v;
            }
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|p| p.id == id) {
            row.is_active = false;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryProductStore>,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_origins(&[])
    }

    pub fn with_origins(origins: &[String]) -> Self {
        Self::build(origins, None)
    }

    /// Upload dir points at a path that does not exist, so every write fails.
    pub fn with_missing_upload_dir() -> Self {
        Self::build(&[], Some("does-not-exist"))
    }

    fn build(origins: &[String], upload_subdir: Option<&str>) -> Self {
        let store = Arc::new(InMemoryProductStore::default());
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let upload_path = match upload_subdir {
            Some(sub) => upload_dir.path().join(sub),
            None => upload_dir.path().to_path_buf(),
        };
        let state = AppState::new(store.clone(), ADMIN_TOKEN, upload_path);
        TestApp {
            router: app_router(state, origins),
            store,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("router is infallible")
    }
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(serde_json::to_vec(body).unwrap())).unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn authed_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::empty())
        .unwrap()
}

/// Hand-built multipart body with a single file part.
pub fn multipart_request(field: &str, filename: &str, content: &[u8], token: Option<&str>) -> Request<Body> {
    let disposition = format!("form-data; name=\"{}\"; filename=\"{}\"", field, filename);
    multipart_with_disposition(&disposition, content, token)
}

/// Single plain form field, no filename.
pub fn multipart_field_request(field: &str, content: &[u8], token: Option<&str>) -> Request<Body> {
    let disposition = format!("form-data; name=\"{}\"", field);
    multipart_with_disposition(&disposition, content, token)
}

fn multipart_with_disposition(disposition: &str, content: &[u8], token: Option<&str>) -> Request<Body> {
    let boundary = "----market-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("Content-Type", format!("multipart/form-data; boundary={}", boundary));
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub fn product_body(title: &str, category: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "A useful thing",
        "highlights": ["fast shipping"],
        "price_ton": 2.5,
        "category": category,
        "images": ["https://cdn.example.com/item.png"],
        "stock": 3
    })
}
