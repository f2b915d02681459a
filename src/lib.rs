//! Product marketplace REST API: public catalog reads, admin-token writes, image uploads.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use model::{NewProduct, Product, StringList};
pub use routes::{api_routes, app_router, common_routes};
pub use service::{ListFilter, PgProductRepository, ProductPage, ProductPatch, ProductStore};
pub use state::AppState;
pub use store::{connect, ensure_database_exists, ensure_schema};
