//! Click tallies for any trackable entity.

use crate::domain::click::{Click, ClickKind, Clicks};
use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use std::collections::HashMap;

const ENTITY: &str = "click";

#[derive(Debug, FromRow)]
struct ClickRow {
    id: i64,
    type_id: i64,
    created_at: DateTime<Utc>,
}

impl ClickRow {
    fn into_click(self, kind: ClickKind) -> Click {
        Click {
            id: self.id,
            kind,
            type_id: self.type_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct ClickStorage {
    pool: PgPool,
}

impl ClickStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one click on `(kind, type_id)`.
    pub async fn add(&self, kind: ClickKind, type_id: i64) -> Result<Click> {
        let click = insert_click(&self.pool, kind, type_id)
            .await
            .map_err(|e| StorageError::not_inserted(ENTITY, e))?;
        tracing::debug!(?kind, type_id, click_id = click.id, "click recorded");
        Ok(click)
    }

    /// Every click recorded on `(kind, type_id)`, oldest first.
    pub async fn list(&self, kind: ClickKind, type_id: i64) -> Result<Clicks> {
        let mut by_owner = load_clicks(&self.pool, kind, &[type_id])
            .await
            .map_err(|e| StorageError::lookup_failed(ENTITY, e))?;
        Ok(by_owner.remove(&type_id).unwrap_or_default())
    }
}

pub(crate) async fn insert_click<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ClickKind,
    type_id: i64,
) -> sqlx::Result<Click> {
    let row: ClickRow = sqlx::query_as(
        "INSERT INTO clicks (type, type_id) VALUES ($1, $2)
         RETURNING id, type_id, created_at",
    )
    .bind(i32::from(kind))
    .bind(type_id)
    .fetch_one(executor)
    .await?;
    Ok(row.into_click(kind))
}

/// Clicks of `kind` for each id in `type_ids`, grouped by id.
pub(crate) async fn load_clicks<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ClickKind,
    type_ids: &[i64],
) -> sqlx::Result<HashMap<i64, Clicks>> {
    let rows: Vec<ClickRow> = sqlx::query_as(
        "SELECT id, type_id, created_at FROM clicks
         WHERE type = $1 AND type_id = ANY($2) AND deleted_at IS NULL
         ORDER BY id",
    )
    .bind(i32::from(kind))
    .bind(type_ids)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<i64, Clicks> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.type_id)
            .or_default()
            .push(row.into_click(kind));
    }
    Ok(grouped)
}
