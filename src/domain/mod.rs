//! Domain types: stored entities and the promotion schedule rules.

pub mod click;
pub mod client;
pub mod model;
pub mod promotion;
