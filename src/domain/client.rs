use serde::{Deserialize, Serialize};

/// Restaurant owning promotions.
///
/// `timezone` is an IANA identifier such as `America/Mexico_City`; promotion
/// schedules are evaluated in it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub timezone: String,
}
