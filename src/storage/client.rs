//! Client lookup. Only what promotion scheduling needs.

use crate::domain::client::Client;
use crate::domain::promotion::schedule::resolve_timezone;
use crate::error::{Result, StorageError};
use sqlx::{FromRow, PgPool};

const ENTITY: &str = "client";

#[derive(Debug, FromRow)]
struct ClientRow {
    id: i64,
    name: String,
    timezone: String,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            timezone: row.timezone,
        }
    }
}

#[derive(Clone)]
pub struct ClientStorage {
    pool: PgPool,
}

impl ClientStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts `client` and fills in its id.
    pub async fn create(&self, client: &mut Client) -> Result<()> {
        if client.name.is_empty() {
            return Err(StorageError::required("name"));
        }
        if resolve_timezone(&client.timezone).is_none() {
            return Err(StorageError::required("timezone"));
        }

        let id: i64 =
            sqlx::query_scalar("INSERT INTO clients (name, timezone) VALUES ($1, $2) RETURNING id")
                .bind(&client.name)
                .bind(&client.timezone)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StorageError::not_inserted(ENTITY, e))?;

        client.id = id;
        tracing::info!(client_id = id, timezone = %client.timezone, "client created");
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Client> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, name, timezone FROM clients WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::lookup_failed(ENTITY, e))?;

        row.map(Client::from)
            .ok_or_else(|| StorageError::missing(ENTITY))
    }
}
