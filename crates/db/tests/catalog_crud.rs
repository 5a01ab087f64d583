//! Integration tests for product and category CRUD.

use catalog_core::types::DbId;
use catalog_db::models::category::CreateCategory;
use catalog_db::models::product::{CreateProduct, UpdateProduct};
use catalog_db::repositories::{CategoryRepo, ProductRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
    }
}

fn new_product(name: &str, category_ids: Vec<DbId>) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: "A product".to_string(),
        price: Decimal::new(125000, 2),
        img_url: "https://img.example/1.jpg".to_string(),
        date: None,
        category_ids,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    catalog_db::health_check(&pool).await.unwrap();
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_create_and_list(pool: PgPool) {
    let b = CategoryRepo::create(&pool, &new_category("Electronics")).await.unwrap();
    let a = CategoryRepo::create(&pool, &new_category("  Books ")).await.unwrap();
    assert_eq!(a.name, "Books");

    let all = CategoryRepo::list(&pool).await.unwrap();
    assert_eq!(all, vec![a.clone(), b]);

    let found = CategoryRepo::find_by_id(&pool, a.id).await.unwrap();
    assert_eq!(found, Some(a));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_duplicate_name_violates_unique(pool: PgPool) {
    CategoryRepo::create(&pool, &new_category("Books")).await.unwrap();
    let err = CategoryRepo::create(&pool, &new_category("Books"))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_categories_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_category_ids(pool: PgPool) {
    let books = CategoryRepo::create(&pool, &new_category("Books")).await.unwrap();

    let missing = CategoryRepo::find_missing_ids(&pool, &[books.id, 9001, 9000, 9001])
        .await
        .unwrap();
    assert_eq!(missing, vec![9000, 9001]);

    let none = CategoryRepo::find_missing_ids(&pool, &[books.id]).await.unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_create_and_find(pool: PgPool) {
    let books = CategoryRepo::create(&pool, &new_category("Books")).await.unwrap();
    let created = ProductRepo::create(&pool, &new_product("Dune", vec![books.id, books.id]))
        .await
        .unwrap();

    assert_eq!(created.name, "Dune");
    assert_eq!(created.price, Decimal::new(125000, 2));
    assert_eq!(created.categories.len(), 1);

    let found = ProductRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found, Some(created));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_find_missing_returns_none(pool: PgPool) {
    let found = ProductRepo::find_by_id(&pool, 424242).await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_update_is_partial(pool: PgPool) {
    let books = CategoryRepo::create(&pool, &new_category("Books")).await.unwrap();
    let games = CategoryRepo::create(&pool, &new_category("Games")).await.unwrap();
    let created = ProductRepo::create(&pool, &new_product("Dune", vec![books.id]))
        .await
        .unwrap();

    let renamed = ProductRepo::update(
        &pool,
        created.id,
        &UpdateProduct {
            name: Some("Dune Messiah".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "Dune Messiah");
    assert_eq!(renamed.description, created.description);
    assert_eq!(renamed.categories, created.categories);

    let recategorised = ProductRepo::update(
        &pool,
        created.id,
        &UpdateProduct {
            category_ids: Some(vec![games.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    let ids: Vec<DbId> = recategorised.categories.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![games.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_update_missing_returns_none(pool: PgPool) {
    let updated = ProductRepo::update(&pool, 424242, &UpdateProduct::default())
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_delete_cascades_associations(pool: PgPool) {
    let books = CategoryRepo::create(&pool, &new_category("Books")).await.unwrap();
    let created = ProductRepo::create(&pool, &new_product("Dune", vec![books.id]))
        .await
        .unwrap();

    assert!(ProductRepo::delete(&pool, created.id).await.unwrap());
    assert!(!ProductRepo::delete(&pool, created.id).await.unwrap());

    let links: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM product_categories WHERE product_id = $1")
            .bind(created.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(links.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_in_use_cannot_be_deleted(pool: PgPool) {
    let books = CategoryRepo::create(&pool, &new_category("Books")).await.unwrap();
    ProductRepo::create(&pool, &new_product("Dune", vec![books.id]))
        .await
        .unwrap();

    let err = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(books.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}
