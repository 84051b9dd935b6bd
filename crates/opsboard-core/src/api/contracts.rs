//! Contract endpoints.

use serde::Serialize;

use crate::models::{Contract, ContractStatus};

use super::{ApiClient, ApiError};

/// Request shape for contract listings. Stored by the contract store as its
/// `last_filters` and compared by equality for staleness decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContractStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateContractRequest {
    pub title: String,
    pub counterparty: String,
    pub value: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateContractStatusRequest {
    pub status: ContractStatus,
}

impl ApiClient {
    pub async fn list_contracts(
        &self,
        filters: &ContractFilters,
    ) -> Result<Vec<Contract>, ApiError> {
        self.get_with_query("/contracts", filters).await
    }

    pub async fn create_contract(
        &self,
        req: &CreateContractRequest,
    ) -> Result<Contract, ApiError> {
        self.post("/contracts", req).await
    }

    pub async fn update_contract_status(
        &self,
        id: &str,
        req: &UpdateContractStatusRequest,
    ) -> Result<Contract, ApiError> {
        self.put(&format!("/contracts/{id}/status"), req).await
    }

    pub async fn delete_contract(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/contracts/{id}")).await
    }
}
