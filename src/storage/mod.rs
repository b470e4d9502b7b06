pub mod click;
pub mod client;
pub mod ingredient;
pub mod promotion;

pub use click::ClickStorage;
pub use client::ClientStorage;
pub use ingredient::IngredientStorage;
pub use promotion::{PgPromotionStorage, PromotionStorage};
