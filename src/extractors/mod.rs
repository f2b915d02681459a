//! Request extractors with API-shaped rejections.

pub mod json;
pub mod product_id;

pub use json::ApiJson;
pub use product_id::ProductId;
