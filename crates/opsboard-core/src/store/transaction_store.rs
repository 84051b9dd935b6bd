//! Financial transactions cache.

use crate::api::TransactionFilters;
use crate::models::{Transaction, TransactionKind};
use crate::store::Collection;

#[derive(Debug, Default)]
pub struct TransactionStore {
    pub transactions: Collection<Transaction, TransactionFilters>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions newest-first by occurrence date.
    pub fn recent(&self) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self.transactions.iter().collect();
        txs.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then_with(|| a.id.cmp(&b.id)));
        txs
    }

    /// Net balance across the currently cached window: income minus expense.
    pub fn balance(&self) -> f64 {
        self.transactions
            .iter()
            .map(|t| match t.kind {
                TransactionKind::Income => t.value,
                TransactionKind::Expense => -t.value,
            })
            .sum()
    }

    pub fn linked_to_contract(&self, contract_id: &str) -> Vec<&Transaction> {
        let mut txs: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.contract_id.as_deref() == Some(contract_id))
            .collect();
        txs.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        txs
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn tx(id: &str, kind: TransactionKind, value: f64, contract: Option<&str>) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            value,
            currency: "EUR".to_string(),
            category: None,
            occurred_at: Utc::now() - Duration::hours(1),
            contract_id: contract.map(|c| c.to_string()),
            note: None,
        }
    }

    #[test]
    fn balance_nets_income_against_expense() {
        let mut store = TransactionStore::new();
        store
            .transactions
            .insert_if_absent(tx("t1", TransactionKind::Income, 1000.0, None));
        store
            .transactions
            .insert_if_absent(tx("t2", TransactionKind::Expense, 300.0, None));
        assert_eq!(store.balance(), 700.0);
    }

    #[test]
    fn linked_transactions_are_filtered_by_contract() {
        let mut store = TransactionStore::new();
        store
            .transactions
            .insert_if_absent(tx("t1", TransactionKind::Income, 50.0, Some("ct-1")));
        store
            .transactions
            .insert_if_absent(tx("t2", TransactionKind::Income, 60.0, Some("ct-2")));
        let linked = store.linked_to_contract("ct-1");
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, "t1");
    }
}
