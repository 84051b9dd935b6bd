//! Card endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Card;

use super::{ApiClient, ApiError, PositionUpdate};

#[derive(Debug, Clone, Serialize)]
pub struct CreateCardRequest {
    /// Client-generated id so the optimistic insert and the server row
    /// agree; the server may still answer with its own.
    pub id: String,
    pub list_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub position: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveCardRequest {
    pub list_id: String,
    pub position: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub renumbered: Vec<PositionUpdate>,
}

impl ApiClient {
    pub async fn create_card(&self, req: &CreateCardRequest) -> Result<Card, ApiError> {
        self.post("/cards", req).await
    }

    pub async fn update_card(&self, id: &str, req: &UpdateCardRequest) -> Result<Card, ApiError> {
        self.put(&format!("/cards/{id}"), req).await
    }

    pub async fn move_card(&self, id: &str, req: &MoveCardRequest) -> Result<Card, ApiError> {
        self.put(&format!("/cards/{id}/position"), req).await
    }

    pub async fn delete_card(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/cards/{id}")).await
    }
}
