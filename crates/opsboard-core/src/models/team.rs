use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Guest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl Entity for TeamMember {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Revoked,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Invite {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Per-member access to a resource kind ("boards", "contracts", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub member_id: String,
    pub resource: String,
    pub can_read: bool,
    pub can_write: bool,
}

impl Entity for Permission {
    fn id(&self) -> &str {
        &self.id
    }
}
