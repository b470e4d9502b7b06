use super::TableModel;
use std::sync::Arc;

/// Restaurants owning promotions. Only the timezone matters to this layer.
pub struct ClientTable;

impl TableModel for ClientTable {
    fn table_name(&self) -> &str {
        "clients"
    }

    fn get_create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS clients (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            timezone TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            deleted_at TIMESTAMPTZ
        )"
    }
}

/// Promotions. `pictures` and `days` hold the comma-joined lists.
pub struct PromotionTable;

impl TableModel for PromotionTable {
    fn table_name(&self) -> &str {
        "promotions"
    }

    fn get_create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS promotions (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            pictures TEXT NOT NULL DEFAULT '',
            start_at TEXT NOT NULL,
            end_at TEXT NOT NULL,
            description TEXT,
            price DOUBLE PRECISION NOT NULL DEFAULT 0,
            days TEXT NOT NULL DEFAULT '',
            client_id BIGINT NOT NULL REFERENCES clients (id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            deleted_at TIMESTAMPTZ
        )"
    }

    fn get_index_sql(&self) -> &[&str] {
        &["CREATE INDEX IF NOT EXISTS idx_promotions_client_id ON promotions (client_id)"]
    }
}

/// Promotion add-ons. `promotion_id` goes NULL once an order item owns the row.
pub struct IngredientTable;

impl TableModel for IngredientTable {
    fn table_name(&self) -> &str {
        "ingredients"
    }

    fn get_create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            promotion_id BIGINT REFERENCES promotions (id),
            order_item_id BIGINT,
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL DEFAULT 0,
            active BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            deleted_at TIMESTAMPTZ
        )"
    }

    fn get_index_sql(&self) -> &[&str] {
        &["CREATE INDEX IF NOT EXISTS idx_ingredients_promotion_id ON ingredients (promotion_id)"]
    }
}

/// Generic tally events keyed by `(type, type_id)`.
pub struct ClickTable;

impl TableModel for ClickTable {
    fn table_name(&self) -> &str {
        "clicks"
    }

    fn get_create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS clicks (
            id BIGSERIAL PRIMARY KEY,
            type INTEGER NOT NULL,
            type_id BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            deleted_at TIMESTAMPTZ
        )"
    }

    fn get_index_sql(&self) -> &[&str] {
        &["CREATE INDEX IF NOT EXISTS idx_clicks_type_type_id ON clicks (type, type_id)"]
    }
}

/// Every table, parents before children so foreign keys resolve on creation.
pub fn all_tables() -> Vec<Arc<dyn TableModel>> {
    vec![
        Arc::new(ClientTable),
        Arc::new(PromotionTable),
        Arc::new(IngredientTable),
        Arc::new(ClickTable),
    ]
}
