pub mod boards;
pub mod cards;
pub mod client;
pub mod contracts;
pub mod team;
pub mod transactions;

pub use boards::{
    BoardDetail, CreateBoardRequest, CreateListRequest, MoveListRequest, RenameListRequest,
    UpdateBoardRequest,
};
pub use cards::{CreateCardRequest, MoveCardRequest, UpdateCardRequest};
pub use client::{ApiClient, ApiError, Envelope};
pub use contracts::{ContractFilters, CreateContractRequest, UpdateContractStatusRequest};
pub use team::{SendInviteRequest, UpdateMemberRoleRequest};
pub use transactions::{CreateTransactionRequest, TransactionFilters};

use serde::Serialize;

/// One rewritten sibling key, attached to move requests after a local
/// renumber pass so the server applies the same ordering.
#[derive(Debug, Clone, Serialize)]
pub struct PositionUpdate {
    pub id: String,
    pub position: f64,
}

impl From<(String, f64)> for PositionUpdate {
    fn from((id, position): (String, f64)) -> Self {
        Self { id, position }
    }
}
