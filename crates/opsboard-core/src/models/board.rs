use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// A kanban board. Boards themselves form a manually ordered collection
/// (drag to reorder in the sidebar), so they carry a fractional `position`
/// like lists and cards do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub title: String,
    pub position: f64,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Board {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A column within a board, ordered by `position` among its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub position: f64,
}

impl Entity for BoardList {
    fn id(&self) -> &str {
        &self.id
    }
}
