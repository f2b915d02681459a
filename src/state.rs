//! Shared application state for all routes.

use crate::service::ProductStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
    /// Static bearer secret for write endpoints.
    pub admin_token: Arc<str>,
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductStore>, admin_token: impl Into<Arc<str>>, upload_dir: PathBuf) -> Self {
        AppState {
            products,
            admin_token: admin_token.into(),
            upload_dir: Arc::new(upload_dir),
        }
    }
}
