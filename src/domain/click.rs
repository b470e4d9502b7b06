//! Click tally events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of trackable entity a click points at. Stored as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ClickKind {
    Ad = 0,
    Promotion = 1,
    Suggested = 2,
}

impl From<ClickKind> for i32 {
    fn from(kind: ClickKind) -> Self {
        kind as i32
    }
}

impl TryFrom<i32> for ClickKind {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ClickKind::Ad),
            1 => Ok(ClickKind::Promotion),
            2 => Ok(ClickKind::Suggested),
            other => Err(format!("unknown click type {}", other)),
        }
    }
}

/// One recorded interaction with an ad, promotion or suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Click {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ClickKind,
    pub type_id: i64,
    pub created_at: DateTime<Utc>,
}

pub type Clicks = Vec<Click>;
