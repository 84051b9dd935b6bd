use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Sent,
    Signed,
    Declined,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub title: String,
    pub counterparty: String,
    pub value: f64,
    pub currency: String,
    pub status: ContractStatus,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Contract {
    fn id(&self) -> &str {
        &self.id
    }
}
