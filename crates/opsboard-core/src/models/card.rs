use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// A card on a board, owned by exactly one list at a time. `list_id` plus
/// `position` fully determine where it renders; cross-list moves rewrite
/// both in a single mutation so a card is never in zero or two lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub list_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub position: f64,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Card {
    fn id(&self) -> &str {
        &self.id
    }
}
