//! Product persistence: the `ProductStore` seam and its PostgreSQL implementation.

use crate::error::AppError;
use crate::model::{NewProduct, Product};
use crate::service::ProductPatch;
use crate::sql::{self, bind_query, bind_query_as};
use async_trait::async_trait;
use sqlx::PgPool;

pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Listing parameters. Unset or non-positive limit means [`DEFAULT_LIST_LIMIT`]; there is no upper bound.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListFilter {
    pub fn effective_limit(&self) -> i64 {
        self.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIST_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.filter(|n| *n > 0).unwrap_or(0)
    }
}

/// Page of products plus the total count of matching rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Active products, newest first.
    async fn list(&self, filter: &ListFilter) -> Result<ProductPage, AppError>;

    /// Active product by id; hidden and missing rows are both `NotFound`.
    async fn get(&self, id: i64) -> Result<Product, AppError>;

    async fn create(&self, product: NewProduct) -> Result<Product, AppError>;

    /// Apply the patch to the row with `id`, active or not. A missing id is not reported.
    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<(), AppError>;

    /// Soft delete. A missing id is not reported.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Storage liveness probe used by the readiness route.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        PgProductRepository { pool }
    }

    async fn execute(&self, q: &sql::QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let result = bind_query(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ProductStore for PgProductRepository {
    async fn list(&self, filter: &ListFilter) -> Result<ProductPage, AppError> {
        let count = sql::count_list(filter);
        tracing::debug!(sql = %count.sql, params = ?count.params, "query");
        let (total,): (i64,) = bind_query_as(sqlx::query_as(&count.sql), &count.params)
            .fetch_one(&self.pool)
            .await?;

        let q = sql::select_list(filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let items: Vec<Product> = bind_query_as(sqlx::query_as(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(ProductPage { items, total })
    }

    async fn get(&self, id: i64) -> Result<Product, AppError> {
        let q = sql::select_active_by_id(id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        bind_query_as(sqlx::query_as::<_, Product>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("product not found".into()))
    }

    async fn create(&self, product: NewProduct) -> Result<Product, AppError> {
        let q = sql::insert(&product);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_query_as(sqlx::query_as::<_, Product>(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<(), AppError> {
        let affected = self.execute(&sql::update(id, patch)).await?;
        tracing::debug!(id, affected, fields = ?patch.field_names(), "product updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let affected = self.execute(&sql::soft_delete(id)).await?;
        tracing::debug!(id, affected, "product hidden");
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
