//! Product repository and request validation.

mod repository;
mod validation;
pub use repository::{ListFilter, PgProductRepository, ProductPage, ProductStore, DEFAULT_LIST_LIMIT};
pub use validation::{validation_error, CreateProductRequest, ProductPatch, UpdateProductRequest};
