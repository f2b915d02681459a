//! Builds parameterized SELECT, INSERT, UPDATE for the products table.

use super::params::PgBindValue;
use crate::model::NewProduct;
use crate::service::{ListFilter, ProductPatch};

pub const PRODUCTS_TABLE: &str = "products";

/// Column list shared by every statement that returns full rows.
pub const PRODUCT_COLUMNS: &str = "id, seller_id, title, description, highlights, price_ton, category, images, \
     stock, is_active, created_at, updated_at";

/// Quote identifier for PostgreSQL (identifiers are compile-time constants here).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> u32 {
        self.params.push(v.into());
        self.params.len() as u32
    }
}

/// WHERE clause for active rows, optionally narrowed to one category.
fn active_filter(q: &mut QueryBuf, filter: &ListFilter) -> String {
    let mut where_parts = vec!["is_active = TRUE".to_string()];
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        let n = q.push_param(category.to_string());
        where_parts.push(format!("category = ${}", n));
    }
    format!(" WHERE {}", where_parts.join(" AND "))
}

/// Page of active rows, newest first.
pub fn select_list(filter: &ListFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = active_filter(&mut q, filter);
    let limit = q.push_param(filter.effective_limit());
    let offset = q.push_param(filter.effective_offset());
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
        PRODUCT_COLUMNS, PRODUCTS_TABLE, where_clause, limit, offset
    );
    q
}

/// Count of active rows matching the filter, ignoring pagination.
pub fn count_list(filter: &ListFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = active_filter(&mut q, filter);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", PRODUCTS_TABLE, where_clause);
    q
}

/// Single active row by id.
pub fn select_active_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE id = ${} AND is_active = TRUE",
        PRODUCT_COLUMNS, PRODUCTS_TABLE, n
    );
    q
}

/// INSERT returning the stored row; id and timestamps come from column defaults.
pub fn insert(product: &NewProduct) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values: Vec<(&str, PgBindValue)> = vec![
        ("seller_id", product.seller_id.into()),
        ("title", product.title.clone().into()),
        ("description", product.description.clone().into()),
        ("highlights", product.highlights.clone().into()),
        ("price_ton", product.price_ton.into()),
        ("category", product.category.clone().into()),
        ("images", product.images.clone().into()),
        ("stock", product.stock.into()),
        ("is_active", product.is_active.into()),
    ];
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        PRODUCTS_TABLE,
        cols.join(", "),
        placeholders.join(", "),
        PRODUCT_COLUMNS
    );
    q
}

fn patch_assignments(patch: &ProductPatch) -> Vec<(&'static str, PgBindValue)> {
    let mut out: Vec<(&'static str, PgBindValue)> = Vec::new();
    if let Some(v) = &patch.title {
        out.push(("title", v.clone().into()));
    }
    if let Some(v) = &patch.description {
        out.push(("description", v.clone().into()));
    }
    if let Some(v) = &patch.highlights {
        out.push(("highlights", v.clone().into()));
    }
    if let Some(v) = patch.price_ton {
        out.push(("price_ton", v.into()));
    }
    if let Some(v) = &patch.category {
        out.push(("category", v.clone().into()));
    }
    if let Some(v) = &patch.images {
        out.push(("images", v.clone().into()));
    }
    if let Some(v) = patch.stock {
        out.push(("stock", v.into()));
    }
    if let Some(v) = patch.is_active {
        out.push(("is_active", v.into()));
    }
    out
}

/// UPDATE of the patched columns only. No is_active filter, so hidden rows stay editable.
pub fn update(id: i64, patch: &ProductPatch) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (col, v) in patch_assignments(patch) {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    sets.push("updated_at = NOW()".to_string());
    let n = q.push_param(id);
    q.sql = format!("UPDATE {} SET {} WHERE id = ${}", PRODUCTS_TABLE, sets.join(", "), n);
    q
}

/// Soft delete: hide the row, never remove it.
pub fn soft_delete(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET is_active = FALSE, updated_at = NOW() WHERE id = ${}",
        PRODUCTS_TABLE, n
    );
    q
}
