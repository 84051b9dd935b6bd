//! Board and list endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{Board, BoardList, Card};

use super::{ApiClient, ApiError, PositionUpdate};

#[derive(Debug, Clone, Serialize)]
pub struct CreateBoardRequest {
    /// Client-generated id; the server may re-key.
    pub id: String,
    pub title: String,
    pub position: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBoardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Full payload of `GET /boards/{id}`: the board plus its lists and cards.
#[derive(Debug, Deserialize)]
pub struct BoardDetail {
    pub board: Board,
    pub lists: Vec<BoardList>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateListRequest {
    pub board_id: String,
    pub title: String,
    pub position: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameListRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveListRequest {
    pub position: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub renumbered: Vec<PositionUpdate>,
}

impl ApiClient {
    pub async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.get("/boards").await
    }

    pub async fn get_board(&self, id: &str) -> Result<BoardDetail, ApiError> {
        self.get(&format!("/boards/{id}")).await
    }

    pub async fn create_board(&self, req: &CreateBoardRequest) -> Result<Board, ApiError> {
        self.post("/boards", req).await
    }

    pub async fn update_board(
        &self,
        id: &str,
        req: &UpdateBoardRequest,
    ) -> Result<Board, ApiError> {
        self.put(&format!("/boards/{id}"), req).await
    }

    pub async fn delete_board(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/boards/{id}")).await
    }

    pub async fn create_list(&self, req: &CreateListRequest) -> Result<BoardList, ApiError> {
        self.post("/lists", req).await
    }

    pub async fn rename_list(
        &self,
        id: &str,
        req: &RenameListRequest,
    ) -> Result<BoardList, ApiError> {
        self.put(&format!("/lists/{id}"), req).await
    }

    pub async fn move_list(&self, id: &str, req: &MoveListRequest) -> Result<BoardList, ApiError> {
        self.put(&format!("/lists/{id}/position"), req).await
    }

    pub async fn delete_list(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/lists/{id}")).await
    }
}
