//! PostgreSQL repository tests.
//!
//! Run only when `TEST_DATABASE_URL` points at a disposable database; otherwise each test returns early.
//!
//! ```sh
//! TEST_DATABASE_URL=postgres://localhost/market_test cargo test --test postgres_tests -- --test-threads=1
//! ```

use rust_decimal::Decimal;
use sqlx::PgPool;
use tg_market_api::{
    connect, ensure_schema, AppError, ListFilter, NewProduct, PgProductRepository, ProductPatch, ProductStore,
    StringList,
};

async fn setup() -> Option<(PgPool, PgProductRepository)> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = connect(&url, 2).await.expect("connect to TEST_DATABASE_URL");
    ensure_schema(&pool).await.expect("schema");
    sqlx::query("TRUNCATE products RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate");
    Some((pool.clone(), PgProductRepository::new(pool)))
}

fn new_product(title: &str, category: &str) -> NewProduct {
    NewProduct {
        seller_id: 0,
        title: title.into(),
        description: "desc".into(),
        highlights: StringList(vec!["one".into(), "two".into()]),
        price_ton: Decimal::new(1_250_000, 6),
        category: category.into(),
        images: StringList(vec!["https://cdn.example.com/a.png".into()]),
        stock: 2,
        is_active: true,
    }
}

#[tokio::test]
async fn create_then_get_round_trips_columns() {
    let Some((_pool, repo)) = setup().await else { return };
    let created = repo.create(new_product("Ledger", "hardware")).await.unwrap();
    assert!(created.id > 0);
    assert!(created.is_active);

    let fetched = repo.get(created.id).await.unwrap();
    assert_eq!(fetched.highlights, StringList(vec!["one".into(), "two".into()]));
    assert_eq!(fetched.price_ton, Decimal::new(125, 2));
    assert_eq!(fetched.images.len(), 1);
}

#[tokio::test]
async fn list_filters_orders_and_counts() {
    let Some((pool, repo)) = setup().await else { return };
    let a = repo.create(new_product("a", "books")).await.unwrap();
    let b = repo.create(new_product("b", "books")).await.unwrap();
    repo.create(new_product("c", "home")).await.unwrap();
    // Make creation order explicit regardless of clock resolution.
    sqlx::query("UPDATE products SET created_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(a.id)
        .execute(&pool)
        .await
        .unwrap();

    let filter = ListFilter {
        category: Some("books".into()),
        limit: Some(1),
        offset: None,
    };
    let page = repo.list(&filter).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, b.id);
}

#[tokio::test]
async fn soft_delete_hides_row_but_update_still_applies() {
    let Some((pool, repo)) = setup().await else { return };
    let p = repo.create(new_product("Lamp", "home")).await.unwrap();
    repo.delete(p.id).await.unwrap();

    assert!(matches!(repo.get(p.id).await, Err(AppError::NotFound(_))));
    assert_eq!(repo.list(&ListFilter::default()).await.unwrap().total, 0);

    let patch = ProductPatch {
        stock: Some(9),
        ..Default::default()
    };
    repo.update(p.id, &patch).await.unwrap();
    let (stock, active): (i32, bool) = sqlx::query_as("SELECT stock, is_active FROM products WHERE id = $1")
        .bind(p.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stock, 9);
    assert!(!active);
}

#[tokio::test]
async fn patch_leaves_other_columns_alone() {
    let Some((_pool, repo)) = setup().await else { return };
    let p = repo.create(new_product("Desk", "home")).await.unwrap();
    let patch = ProductPatch {
        title: Some("Standing desk".into()),
        ..Default::default()
    };
    repo.update(p.id, &patch).await.unwrap();

    let after = repo.get(p.id).await.unwrap();
    assert_eq!(after.title, "Standing desk");
    assert_eq!(after.description, p.description);
    assert_eq!(after.stock, p.stock);
    assert!(after.updated_at >= p.updated_at);
}

#[tokio::test]
async fn unknown_id_update_is_silent() {
    let Some((_pool, repo)) = setup().await else { return };
    let patch = ProductPatch {
        stock: Some(1),
        ..Default::default()
    };
    repo.update(12345, &patch).await.unwrap();
    repo.delete(12345).await.unwrap();
}
