//! Product row and the insert payload built from a validated create request.

use super::StringList;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Seller id assigned to every new product until multi-seller support exists.
pub const DEFAULT_SELLER_ID: i32 = 0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub seller_id: i32,
    pub title: String,
    pub description: String,
    pub highlights: StringList,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_ton: Decimal,
    pub category: String,
    pub images: StringList,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for an INSERT. Storage fills id and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub seller_id: i32,
    pub title: String,
    pub description: String,
    pub highlights: StringList,
    pub price_ton: Decimal,
    pub category: String,
    pub images: StringList,
    pub stock: i32,
    pub is_active: bool,
}

impl NewProduct {
    /// Materialize the row storage would return, given the generated id and timestamp.
    pub fn into_product(self, id: i64, now: DateTime<Utc>) -> Product {
        Product {
            id,
            seller_id: self.seller_id,
            title: self.title,
            description: self.description,
            highlights: self.highlights,
            price_ton: self.price_ton,
            category: self.category,
            images: self.images,
            stock: self.stock,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
