//! Contracts cache.

use crate::api::ContractFilters;
use crate::models::{Contract, ContractStatus};
use crate::store::Collection;

#[derive(Debug, Default)]
pub struct ContractStore {
    pub contracts: Collection<Contract, ContractFilters>,
}

impl ContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contracts newest-first, the default listing order.
    pub fn recent(&self) -> Vec<&Contract> {
        let mut contracts: Vec<&Contract> = self.contracts.iter().collect();
        contracts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        contracts
    }

    /// Sum of contract values in a given status, for the dashboard tiles.
    pub fn total_value(&self, status: ContractStatus) -> f64 {
        self.contracts
            .iter()
            .filter(|c| c.status == status)
            .map(|c| c.value)
            .sum()
    }

    pub fn clear(&mut self) {
        self.contracts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn contract(id: &str, value: f64, status: ContractStatus, age_mins: i64) -> Contract {
        Contract {
            id: id.to_string(),
            title: format!("contract {id}"),
            counterparty: "Acme".to_string(),
            value,
            currency: "EUR".to_string(),
            status,
            signed_at: None,
            created_at: Utc::now() - Duration::minutes(age_mins),
        }
    }

    #[test]
    fn recent_orders_newest_first() {
        let mut store = ContractStore::new();
        store
            .contracts
            .insert_if_absent(contract("old", 1.0, ContractStatus::Draft, 60));
        store
            .contracts
            .insert_if_absent(contract("new", 1.0, ContractStatus::Draft, 1));
        let ids: Vec<&str> = store.recent().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn total_value_sums_only_matching_status() {
        let mut store = ContractStore::new();
        store
            .contracts
            .insert_if_absent(contract("a", 100.0, ContractStatus::Signed, 1));
        store
            .contracts
            .insert_if_absent(contract("b", 25.0, ContractStatus::Signed, 2));
        store
            .contracts
            .insert_if_absent(contract("c", 999.0, ContractStatus::Draft, 3));
        assert_eq!(store.total_value(ContractStatus::Signed), 125.0);
    }
}
