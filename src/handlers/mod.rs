//! HTTP handlers for products and image uploads.

pub mod products;
pub mod upload;
