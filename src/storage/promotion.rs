//! Promotion CRUD over PostgreSQL.
//!
//! Reads decode the `pictures`/`days` text columns into lists and attach the
//! promotion's ingredients and clicks. Writes encode the lists back before
//! they reach SQL. Multi-row writes run in one transaction.

use crate::domain::click::{ClickKind, Clicks};
use crate::domain::promotion::patch::ColumnValue;
use crate::domain::promotion::{
    filter_active, Ingredient, ListCodec, Promotion, PromotionPatch, Promotions,
};
use crate::error::{Result, StorageError};
use crate::storage::click::{insert_click, load_clicks};
use crate::storage::client::ClientStorage;
use crate::storage::ingredient::{insert_ingredient, load_for_promotions, retire_for_promotion};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

const ENTITY: &str = "promotion";

const PROMOTION_COLUMNS: &str =
    "id, title, pictures, start_at, end_at, description, price, days, client_id, created_at, updated_at";

/// Promotion operations consumed by the API layer.
#[async_trait]
pub trait PromotionStorage: Send + Sync {
    /// Validates and inserts `promotion` with its ingredients, then fills in
    /// the generated id, timestamps and ingredient ids.
    async fn create(&self, promotion: &mut Promotion) -> Result<()>;

    /// Applies `patch` to promotion `id`. Ingredients, when present, replace
    /// the current set.
    async fn update(&self, id: i64, patch: PromotionPatch) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn get_all(&self, client_id: i64) -> Result<Promotions>;

    /// Promotions of `client_id` live right now in the client's timezone.
    async fn get_all_active(&self, client_id: i64) -> Result<Promotions>;

    async fn get_by_id(&self, id: i64) -> Result<Promotion>;

    async fn add_click(&self, promotion_id: i64) -> Result<()>;
}

#[derive(Debug, FromRow)]
struct PromotionRow {
    id: i64,
    title: String,
    pictures: String,
    start_at: String,
    end_at: String,
    description: Option<String>,
    price: f64,
    days: String,
    client_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PromotionRow {
    fn into_promotion(self, ingredients: Vec<Ingredient>, clicks: Clicks) -> Promotion {
        Promotion {
            id: self.id,
            title: self.title,
            pictures: ListCodec::PICTURES.decode(&self.pictures),
            start_at: self.start_at,
            end_at: self.end_at,
            description: self.description,
            price: self.price,
            days: ListCodec::DAYS.decode(&self.days),
            ingredients,
            clicks,
            client_id: self.client_id,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// [`PromotionStorage`] backed by a shared `PgPool`.
#[derive(Clone)]
pub struct PgPromotionStorage {
    pool: PgPool,
    clients: ClientStorage,
}

impl PgPromotionStorage {
    pub fn new(pool: PgPool) -> Self {
        let clients = ClientStorage::new(pool.clone());
        Self { pool, clients }
    }

    /// Like [`PromotionStorage::get_all_active`], evaluated at `now`.
    pub async fn get_all_active_at(&self, client_id: i64, now: DateTime<Utc>) -> Result<Promotions> {
        let promotions = self.get_all(client_id).await?;
        let client = self.clients.get_by_id(client_id).await?;

        let total = promotions.len();
        let active = filter_active(promotions, &client, now);
        tracing::debug!(client_id, total, active = active.len(), "filtered active promotions");
        Ok(active)
    }

    /// Attaches ingredients and clicks to freshly read rows.
    async fn hydrate(&self, rows: Vec<PromotionRow>) -> Result<Promotions> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut ingredients = load_for_promotions(&self.pool, &ids)
            .await
            .map_err(|e| StorageError::lookup_failed("ingredient", e))?;
        let mut clicks: HashMap<i64, Clicks> = load_clicks(&self.pool, ClickKind::Promotion, &ids)
            .await
            .map_err(|e| StorageError::lookup_failed("click", e))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_promotion(
                    ingredients.remove(&id).unwrap_or_default(),
                    clicks.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl PromotionStorage for PgPromotionStorage {
    async fn create(&self, promotion: &mut Promotion) -> Result<()> {
        promotion.validate()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::not_inserted(ENTITY, e))?;

        let sql = format!(
            "INSERT INTO promotions (title, pictures, start_at, end_at, description, price, days, client_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            PROMOTION_COLUMNS
        );
        let row: PromotionRow = sqlx::query_as(&sql)
            .bind(&promotion.title)
            .bind(promotion.stored_pictures())
            .bind(&promotion.start_at)
            .bind(&promotion.end_at)
            .bind(&promotion.description)
            .bind(promotion.price)
            .bind(promotion.stored_days())
            .bind(promotion.client_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StorageError::not_inserted(ENTITY, e))?;

        let mut ingredients = Vec::with_capacity(promotion.ingredients.len());
        for ingredient in &promotion.ingredients {
            let stored = insert_ingredient(&mut *tx, row.id, ingredient)
                .await
                .map_err(|e| StorageError::not_inserted("ingredient", e))?;
            ingredients.push(stored);
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::not_inserted(ENTITY, e))?;

        promotion.id = row.id;
        promotion.created_at = Some(row.created_at);
        promotion.updated_at = Some(row.updated_at);
        promotion.ingredients = ingredients;
        tracing::info!(
            promotion_id = promotion.id,
            client_id = promotion.client_id,
            ingredients = promotion.ingredients.len(),
            "promotion created"
        );
        Ok(())
    }

    async fn update(&self, id: i64, patch: PromotionPatch) -> Result<()> {
        patch.validate()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::not_updated(ENTITY, e))?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE promotions SET ");
        {
            let mut assignments = qb.separated(", ");
            for (column, value) in patch.changes() {
                assignments.push(column).push_unseparated(" = ");
                match value {
                    ColumnValue::Text(text) => assignments.push_bind_unseparated(text),
                    ColumnValue::Float(number) => assignments.push_bind_unseparated(number),
                };
            }
            assignments.push("updated_at = now()");
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND deleted_at IS NULL");

        let result = qb
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::not_updated(ENTITY, e))?;
        if result.rows_affected() == 0 {
            return Err(StorageError::missing(ENTITY));
        }

        if let Some(ingredients) = &patch.ingredients {
            let retired = retire_for_promotion(&mut *tx, id)
                .await
                .map_err(|e| StorageError::not_updated("ingredient", e))?;
            for ingredient in ingredients {
                insert_ingredient(&mut *tx, id, ingredient)
                    .await
                    .map_err(|e| StorageError::not_updated("ingredient", e))?;
            }
            tracing::debug!(
                promotion_id = id,
                retired,
                inserted = ingredients.len(),
                "ingredients replaced"
            );
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::not_updated(ENTITY, e))?;

        tracing::info!(promotion_id = id, "promotion updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE promotions SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::not_deleted(ENTITY, e))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::missing(ENTITY));
        }
        tracing::info!(promotion_id = id, "promotion deleted");
        Ok(())
    }

    async fn get_all(&self, client_id: i64) -> Result<Promotions> {
        let sql = format!(
            "SELECT {} FROM promotions WHERE client_id = $1 AND deleted_at IS NULL ORDER BY id",
            PROMOTION_COLUMNS
        );
        let rows: Vec<PromotionRow> = sqlx::query_as(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::lookup_failed(ENTITY, e))?;

        tracing::debug!(client_id, count = rows.len(), "loaded promotions");
        self.hydrate(rows).await
    }

    async fn get_all_active(&self, client_id: i64) -> Result<Promotions> {
        self.get_all_active_at(client_id, Utc::now()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Promotion> {
        let sql = format!(
            "SELECT {} FROM promotions WHERE id = $1 AND deleted_at IS NULL",
            PROMOTION_COLUMNS
        );
        let row: Option<PromotionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::lookup_failed(ENTITY, e))?;

        let row = row.ok_or_else(|| StorageError::missing(ENTITY))?;
        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StorageError::missing(ENTITY))
    }

    async fn add_click(&self, promotion_id: i64) -> Result<()> {
        let click = insert_click(&self.pool, ClickKind::Promotion, promotion_id)
            .await
            .map_err(|e| StorageError::not_inserted("click", e))?;
        tracing::debug!(promotion_id, click_id = click.id, "promotion click recorded");
        Ok(())
    }
}
