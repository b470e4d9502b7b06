//! The database handle.
//!
//! Owns the connection pool and hands out the per-entity storages. Callers
//! construct one explicitly and pass it (or the storages) to whoever needs
//! database access; nothing here is global.

use crate::domain::model::{all_tables, TableModel};
use crate::error::Result;
use crate::infra::config;
use crate::storage::{ClickStorage, ClientStorage, IngredientStorage, PgPromotionStorage};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connection pool plus schema bootstrap.
#[derive(Clone)]
pub struct DatabaseService {
    pool: PgPool,
}

impl DatabaseService {
    /// Connects using `DATABASE_URL` / `DATABASE_MAX_CONNECTIONS` (a `.env`
    /// file is honoured) and makes sure every table exists.
    pub async fn new() -> Result<Self> {
        dotenv::dotenv().ok();
        let database_url = config::database_url()?;
        let max_connections = config::max_connections()?;

        let service = Self::connect(&database_url, max_connections).await?;
        service.init_schema().await?;
        Ok(service)
    }

    /// Connects without touching the schema.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!(max_connections, "connected to database");
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates missing tables and indexes. Safe to run on every start.
    pub async fn init_schema(&self) -> Result<()> {
        for table in all_tables() {
            sqlx::query(table.get_create_table_sql())
                .execute(&self.pool)
                .await?;
            for index_sql in table.get_index_sql() {
                sqlx::query(index_sql).execute(&self.pool).await?;
            }
            tracing::debug!(table = table.table_name(), "table ready");
        }
        tracing::info!("database schema initialized");
        Ok(())
    }

    /// Names of the tables that do not exist yet.
    pub async fn missing_tables(&self) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for table in all_tables() {
            let found: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
                .bind(table.table_name())
                .fetch_one(&self.pool)
                .await?;
            if found.is_none() {
                missing.push(table.table_name().to_string());
            }
        }
        Ok(missing)
    }

    /// Removes every row from every table and resets the id sequences.
    pub async fn clear_db(&self) -> Result<()> {
        let names: Vec<String> = all_tables()
            .iter()
            .map(|t| t.table_name().to_string())
            .collect();
        sqlx::query(&format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", names.join(", ")))
            .execute(&self.pool)
            .await?;
        tracing::warn!(tables = %names.join(","), "database cleared");
        Ok(())
    }

    /// Closes the pool; pending connections are dropped.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn promotions(&self) -> PgPromotionStorage {
        PgPromotionStorage::new(self.pool.clone())
    }

    pub fn clients(&self) -> ClientStorage {
        ClientStorage::new(self.pool.clone())
    }

    pub fn clicks(&self) -> ClickStorage {
        ClickStorage::new(self.pool.clone())
    }

    pub fn ingredients(&self) -> IngredientStorage {
        IngredientStorage::new(self.pool.clone())
    }
}
