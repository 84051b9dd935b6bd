//! Contract and transaction operations.

use chrono::Utc;
use uuid::Uuid;

use crate::api::{CreateContractRequest, CreateTransactionRequest, UpdateContractStatusRequest};
use crate::error::CoreError;
use crate::models::{Contract, ContractStatus, Transaction};
use crate::optimistic::{EntityKey, Rollback};

use super::CoreRuntime;

impl CoreRuntime {
    /// Create a draft contract. Returns its id.
    pub async fn create_contract(
        &self,
        title: impl Into<String>,
        counterparty: impl Into<String>,
        value: f64,
        currency: impl Into<String>,
    ) -> Result<String, CoreError> {
        self.require_session()?;
        let title = title.into();
        let counterparty = counterparty.into();
        let currency = currency.into();
        let contract_id = format!("contract-{}", Uuid::new_v4());

        let token = {
            let mut stores = self.stores.borrow_mut();
            stores.contracts.contracts.insert_if_absent(Contract {
                id: contract_id.clone(),
                title: title.clone(),
                counterparty: counterparty.clone(),
                value,
                currency: currency.clone(),
                status: ContractStatus::Draft,
                signed_at: None,
                created_at: Utc::now(),
            });
            stores.journal.begin(EntityKey::Contract(contract_id.clone()))
        };

        let req = CreateContractRequest {
            title,
            counterparty,
            value,
            currency,
        };
        let result = self.api.create_contract(&req).await;
        let final_id = match &result {
            Ok(contract) => contract.id.clone(),
            Err(_) => contract_id.clone(),
        };
        self.settle(
            EntityKey::Contract(contract_id.clone()),
            token,
            Rollback::of(&contract_id, None),
            result,
            &contract_id,
            "Could not create contract",
            |stores| &mut stores.contracts.contracts,
        )?;
        Ok(final_id)
    }

    pub async fn update_contract_status(
        &self,
        contract_id: &str,
        status: ContractStatus,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.contracts.contracts.get(contract_id).cloned();
            let Some(contract) = stores.contracts.contracts.get_mut(contract_id) else {
                return Err(CoreError::UnknownEntity {
                    kind: "contract",
                    id: contract_id.to_string(),
                });
            };
            contract.status = status;
            if status == ContractStatus::Signed && contract.signed_at.is_none() {
                contract.signed_at = Some(Utc::now());
            }
            let token = stores
                .journal
                .begin(EntityKey::Contract(contract_id.to_string()));
            (token, Rollback::of(contract_id, prior))
        };

        let req = UpdateContractStatusRequest { status };
        let result = self.api.update_contract_status(contract_id, &req).await;
        self.settle(
            EntityKey::Contract(contract_id.to_string()),
            token,
            rollback,
            result,
            contract_id,
            "Could not update contract",
            |stores| &mut stores.contracts.contracts,
        )
    }

    pub async fn delete_contract(&self, contract_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let Some(prior) = stores.contracts.contracts.remove(contract_id) else {
                return Err(CoreError::UnknownEntity {
                    kind: "contract",
                    id: contract_id.to_string(),
                });
            };
            let token = stores
                .journal
                .begin(EntityKey::Contract(contract_id.to_string()));
            (token, Rollback::Restore(prior))
        };

        let result = self.api.delete_contract(contract_id).await;
        self.settle_removal(
            EntityKey::Contract(contract_id.to_string()),
            token,
            rollback,
            result,
            "Could not delete contract",
            |stores| &mut stores.contracts.contracts,
        )
    }

    /// Record a transaction. Returns its id.
    pub async fn record_transaction(
        &self,
        req: CreateTransactionRequest,
    ) -> Result<String, CoreError> {
        self.require_session()?;
        let tx_id = format!("tx-{}", Uuid::new_v4());

        let token = {
            let mut stores = self.stores.borrow_mut();
            stores.transactions.transactions.insert_if_absent(Transaction {
                id: tx_id.clone(),
                kind: req.kind,
                value: req.value,
                currency: req.currency.clone(),
                category: req.category.clone(),
                occurred_at: req.occurred_at,
                contract_id: req.contract_id.clone(),
                note: req.note.clone(),
            });
            stores.journal.begin(EntityKey::Transaction(tx_id.clone()))
        };

        let result = self.api.create_transaction(&req).await;
        let final_id = match &result {
            Ok(tx) => tx.id.clone(),
            Err(_) => tx_id.clone(),
        };
        self.settle(
            EntityKey::Transaction(tx_id.clone()),
            token,
            Rollback::of(&tx_id, None),
            result,
            &tx_id,
            "Could not record transaction",
            |stores| &mut stores.transactions.transactions,
        )?;
        Ok(final_id)
    }

    pub async fn delete_transaction(&self, tx_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let Some(prior) = stores.transactions.transactions.remove(tx_id) else {
                return Err(CoreError::UnknownEntity {
                    kind: "transaction",
                    id: tx_id.to_string(),
                });
            };
            let token = stores.journal.begin(EntityKey::Transaction(tx_id.to_string()));
            (token, Rollback::Restore(prior))
        };

        let result = self.api.delete_transaction(tx_id).await;
        self.settle_removal(
            EntityKey::Transaction(tx_id.to_string()),
            token,
            rollback,
            result,
            "Could not delete transaction",
            |stores| &mut stores.transactions.transactions,
        )
    }
}
