pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;

// Convenience re-exports (keeps call-sites clean)
pub use app::database_service::DatabaseService;
pub use domain::click::{Click, ClickKind};
pub use domain::client::Client;
pub use domain::promotion::{Ingredient, ListCodec, Promotion, PromotionPatch, Promotions};
pub use error::{Result, StorageError};
pub use storage::{ClickStorage, ClientStorage, IngredientStorage, PgPromotionStorage, PromotionStorage};
