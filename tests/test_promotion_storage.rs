//! Promotion storage against a live PostgreSQL.
//!
//! Every test creates its own client so they can run side by side on one
//! database. Run with:
//!   DATABASE_URL=postgres://... cargo test --test test_promotion_storage -- --ignored

use chrono::{TimeZone, Utc};
use restaurant_storage::{
    Client, ClickKind, DatabaseService, Ingredient, Promotion, PromotionPatch, PromotionStorage,
    StorageError,
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;

async fn setup() -> Result<DatabaseService, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;
    let db = DatabaseService::with_pool(pool);
    db.init_schema().await?;
    Ok(db)
}

async fn new_client(db: &DatabaseService, timezone: &str) -> Result<Client, StorageError> {
    let mut client = Client {
        id: 0,
        name: "Taqueria El Paisa".to_string(),
        timezone: timezone.to_string(),
    };
    db.clients().create(&mut client).await?;
    Ok(client)
}

fn promotion(client_id: i64) -> Promotion {
    Promotion {
        title: "Martes de tacos".to_string(),
        pictures: vec!["tacos.png".to_string(), "salsa.png".to_string()],
        start_at: "09:00".to_string(),
        end_at: "18:00".to_string(),
        description: Some("Dos por uno".to_string()),
        price: 80.0,
        days: vec!["monday".to_string(), "tuesday".to_string()],
        ingredients: vec![
            Ingredient {
                name: "queso".to_string(),
                price: 10.0,
                active: true,
                ..Default::default()
            },
            Ingredient {
                name: "aguacate".to_string(),
                price: 15.0,
                active: false,
                ..Default::default()
            },
        ],
        client_id,
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_and_get_by_id_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "America/Mexico_City").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;
    assert!(p.id > 0);
    assert!(p.ingredients.iter().all(|i| i.id > 0 && i.promotion_id == Some(p.id)));

    let stored = storage.get_by_id(p.id).await?;
    assert_eq!(stored.title, "Martes de tacos");
    assert_eq!(stored.pictures, vec!["tacos.png", "salsa.png"]);
    assert_eq!(stored.days, vec!["monday", "tuesday"]);
    assert_eq!(stored.description.as_deref(), Some("Dos por uno"));
    assert_eq!(stored.ingredients.len(), 2);
    assert!(stored.clicks.is_empty());

    let raw = sqlx::query("SELECT pictures, days FROM promotions WHERE id = $1")
        .bind(p.id)
        .fetch_one(db.pool())
        .await?;
    assert_eq!(raw.try_get::<String, _>("pictures")?, "tacos.png,salsa.png");
    assert_eq!(raw.try_get::<String, _>("days")?, "monday,tuesday");
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_rejects_empty_first_picture() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;

    let mut p = promotion(client.id);
    p.pictures = vec!["".to_string(), "salsa.png".to_string()];
    let err = db.promotions().create(&mut p).await.unwrap_err();
    assert!(matches!(err, StorageError::RequiredField { field: "pictures" }));
    assert_eq!(p.id, 0);

    assert!(db.promotions().get_all(client.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_with_malformed_pictures_keeps_column() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;

    let patch: PromotionPatch = serde_json::from_value(json!({
        "title": "Miercoles de tacos",
        "pictures": "not-a-list.png",
        "days": ["wednesday"]
    }))?;
    storage.update(p.id, patch).await?;

    let stored = storage.get_by_id(p.id).await?;
    assert_eq!(stored.title, "Miercoles de tacos");
    assert_eq!(stored.pictures, vec!["tacos.png", "salsa.png"]);
    assert_eq!(stored.days, vec!["wednesday"]);
    assert_eq!(stored.ingredients.len(), 2, "ingredients untouched without a replacement set");
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_replaces_ingredients() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;

    let patch = PromotionPatch {
        ingredients: Some(vec![Ingredient {
            name: "chipotle".to_string(),
            price: 5.0,
            active: true,
            ..Default::default()
        }]),
        ..Default::default()
    };
    storage.update(p.id, patch).await?;

    let stored = storage.get_by_id(p.id).await?;
    let names: Vec<&str> = stored.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["chipotle"]);
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_rejects_invalid_and_missing() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;

    let err = storage
        .update(
            p.id,
            PromotionPatch {
                title: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::RequiredField { field: "title" }));

    let err = storage
        .update(i64::MAX, PromotionPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(storage.get_by_id(p.id).await?.title, "Martes de tacos");
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn failed_ingredient_insert_rolls_back_update() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;

    // PostgreSQL rejects NUL bytes in TEXT, so the second insert fails after
    // the row update and the first insert already ran.
    let patch = PromotionPatch {
        title: Some("Jueves de tacos".to_string()),
        ingredients: Some(vec![
            Ingredient {
                name: "chipotle".to_string(),
                price: 5.0,
                active: true,
                ..Default::default()
            },
            Ingredient {
                name: "cebolla\0".to_string(),
                price: 2.0,
                active: true,
                ..Default::default()
            },
        ]),
        ..Default::default()
    };
    let err = storage.update(p.id, patch).await.unwrap_err();
    assert!(matches!(err, StorageError::NotUpdated { entity: "ingredient", .. }));

    let stored = storage.get_by_id(p.id).await?;
    assert_eq!(stored.title, "Martes de tacos");
    let mut names: Vec<&str> = stored.ingredients.iter().map(|i| i.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["aguacate", "queso"]);
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_rejects_unknown_client() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let mut p = promotion(i64::MAX);
    let err = db.promotions().create(&mut p).await.unwrap_err();
    assert!(matches!(err, StorageError::NotInserted { entity: "promotion", .. }));
    assert_eq!(p.id, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_hides_promotion() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;
    storage.delete(p.id).await?;

    assert!(storage.get_by_id(p.id).await.unwrap_err().is_not_found());
    assert!(storage.get_all(client.id).await?.is_empty());
    assert!(storage.delete(p.id).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn clicks_are_attached_to_reads() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;
    storage.add_click(p.id).await?;
    storage.add_click(p.id).await?;
    // Same id, different kind: must not show up on the promotion.
    db.clicks().add(ClickKind::Ad, p.id).await?;

    let stored = storage.get_by_id(p.id).await?;
    assert_eq!(stored.clicks.len(), 2);
    assert!(stored.clicks.iter().all(|c| c.kind == ClickKind::Promotion && c.type_id == p.id));

    let all = storage.get_all(client.id).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].clicks.len(), 2);
    assert_eq!(db.clicks().list(ClickKind::Ad, p.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_all_active_uses_client_timezone() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "America/Mexico_City").await?;
    let storage = db.promotions();

    let mut weekday = promotion(client.id);
    storage.create(&mut weekday).await?;

    let mut late_night = promotion(client.id);
    late_night.title = "Trasnoche".to_string();
    late_night.start_at = "22:00".to_string();
    late_night.end_at = "02:00".to_string();
    storage.create(&mut late_night).await?;

    // Monday 2024-01-01 14:00 in Mexico City.
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
    let active = storage.get_all_active_at(client.id, now).await?;
    let titles: Vec<&str> = active.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Martes de tacos"]);
    assert_eq!(active[0].ingredients.len(), 2);

    // Wednesday: nothing.
    let now = Utc.with_ymd_and_hms(2024, 1, 3, 20, 0, 0).unwrap();
    assert!(storage.get_all_active_at(client.id, now).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_all_active_needs_client() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let err = db.promotions().get_all_active(i64::MAX).await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn ingredient_moves_to_order_item() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let client = new_client(&db, "UTC").await?;
    let storage = db.promotions();

    let mut p = promotion(client.id);
    storage.create(&mut p).await?;
    let moved = p.ingredients[0].id;

    let ingredient = db.ingredients().attach_to_order_item(moved, 501).await?;
    assert_eq!(ingredient.promotion_id, None);
    assert_eq!(ingredient.order_item_id, Some(501));

    let remaining = db.ingredients().list_for_promotion(p.id).await?;
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].id, moved);

    // Replacing the promotion's ingredients leaves the order item's copy alone.
    storage
        .update(
            p.id,
            PromotionPatch {
                ingredients: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await?;
    let still_there: Option<i64> = sqlx::query_scalar(
        "SELECT order_item_id FROM ingredients WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(moved)
    .fetch_one(db.pool())
    .await?;
    assert_eq!(still_there, Some(501));
    Ok(())
}

#[tokio::test]
#[ignore = "requires database"]
async fn client_requires_known_timezone() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup().await?;
    let err = new_client(&db, "Mars/Olympus_Mons").await.unwrap_err();
    assert!(matches!(err, StorageError::RequiredField { field: "timezone" }));
    Ok(())
}
