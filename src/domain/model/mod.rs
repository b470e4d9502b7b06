//! Table definitions for the stored entities.

pub mod tables;

pub use tables::{all_tables, ClickTable, ClientTable, IngredientTable, PromotionTable};

/// Contract every stored table fulfils.
///
/// The database service uses it to bootstrap and clear the schema without
/// knowing each table's layout.
pub trait TableModel: Send + Sync {
    /// Returns the name of the database table.
    fn table_name(&self) -> &str;

    /// Returns the idempotent CREATE TABLE statement for this table.
    fn get_create_table_sql(&self) -> &str;

    /// Extra statements (indexes) run after the table exists.
    fn get_index_sql(&self) -> &[&str] {
        &[]
    }
}
