//! Financial transaction endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

use super::{ApiClient, ApiError};

/// Request shape for transaction listings; doubles as the staleness
/// identity for the transaction store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTransactionRequest {
    pub kind: TransactionKind,
    pub value: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ApiClient {
    pub async fn list_transactions(
        &self,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get_with_query("/transactions", filters).await
    }

    pub async fn create_transaction(
        &self,
        req: &CreateTransactionRequest,
    ) -> Result<Transaction, ApiError> {
        self.post("/transactions", req).await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/transactions/{id}")).await
    }
}
