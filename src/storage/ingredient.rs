//! Ingredient rows and their ownership transfer to order items.

use crate::domain::promotion::Ingredient;
use crate::error::{Result, StorageError};
use sqlx::{FromRow, PgExecutor, PgPool};
use std::collections::HashMap;

const ENTITY: &str = "ingredient";

const INGREDIENT_COLUMNS: &str = "id, promotion_id, order_item_id, name, price, active";

#[derive(Debug, FromRow)]
struct IngredientRow {
    id: i64,
    promotion_id: Option<i64>,
    order_item_id: Option<i64>,
    name: String,
    price: f64,
    active: bool,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            promotion_id: row.promotion_id,
            order_item_id: row.order_item_id,
            name: row.name,
            price: row.price,
            active: row.active,
        }
    }
}

#[derive(Clone)]
pub struct IngredientStorage {
    pool: PgPool,
}

impl IngredientStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ingredients the promotion still owns.
    pub async fn list_for_promotion(&self, promotion_id: i64) -> Result<Vec<Ingredient>> {
        let mut by_promotion = load_for_promotions(&self.pool, &[promotion_id])
            .await
            .map_err(|e| StorageError::lookup_failed(ENTITY, e))?;
        Ok(by_promotion.remove(&promotion_id).unwrap_or_default())
    }

    /// Hands the ingredient over to an order item. The promotion stops owning it.
    pub async fn attach_to_order_item(&self, ingredient_id: i64, order_item_id: i64) -> Result<Ingredient> {
        let sql = format!(
            "UPDATE ingredients SET order_item_id = $2, promotion_id = NULL, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            INGREDIENT_COLUMNS
        );
        let row: Option<IngredientRow> = sqlx::query_as(&sql)
            .bind(ingredient_id)
            .bind(order_item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::not_updated(ENTITY, e))?;

        let ingredient: Ingredient = row.ok_or_else(|| StorageError::missing(ENTITY))?.into();
        tracing::info!(ingredient_id, order_item_id, "ingredient attached to order item");
        Ok(ingredient)
    }
}

pub(crate) async fn insert_ingredient<'e, E: PgExecutor<'e>>(
    executor: E,
    promotion_id: i64,
    ingredient: &Ingredient,
) -> sqlx::Result<Ingredient> {
    let sql = format!(
        "INSERT INTO ingredients (promotion_id, name, price, active) VALUES ($1, $2, $3, $4)
         RETURNING {}",
        INGREDIENT_COLUMNS
    );
    let row: IngredientRow = sqlx::query_as(&sql)
        .bind(promotion_id)
        .bind(&ingredient.name)
        .bind(ingredient.price)
        .bind(ingredient.active)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

/// Soft-deletes every ingredient the promotion owns.
pub(crate) async fn retire_for_promotion<'e, E: PgExecutor<'e>>(
    executor: E,
    promotion_id: i64,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE ingredients SET deleted_at = now()
         WHERE promotion_id = $1 AND deleted_at IS NULL",
    )
    .bind(promotion_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn load_for_promotions<'e, E: PgExecutor<'e>>(
    executor: E,
    promotion_ids: &[i64],
) -> sqlx::Result<HashMap<i64, Vec<Ingredient>>> {
    let sql = format!(
        "SELECT {} FROM ingredients
         WHERE promotion_id = ANY($1) AND deleted_at IS NULL
         ORDER BY id",
        INGREDIENT_COLUMNS
    );
    let rows: Vec<IngredientRow> = sqlx::query_as(&sql)
        .bind(promotion_ids)
        .fetch_all(executor)
        .await?;

    let mut grouped: HashMap<i64, Vec<Ingredient>> = HashMap::new();
    for row in rows {
        if let Some(owner) = row.promotion_id {
            grouped.entry(owner).or_default().push(row.into());
        }
    }
    Ok(grouped)
}
