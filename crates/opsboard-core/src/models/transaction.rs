use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A financial transaction, optionally linked to the contract it settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub value: f64,
    pub currency: String,
    #[serde(default)]
    pub category: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Entity for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}
