//! Typed realtime events.
//!
//! The pub/sub service delivers frames shaped `{ event: <tag>, data: ... }`
//! on two topics per tenant. Each channel's tag set is closed and disjoint
//! from the other's; a frame either parses into one of the enums below or
//! is dropped by the dispatcher. Deletion payloads carry only the minimal
//! identifying key.

use serde::Deserialize;

use crate::constants::tags;
use crate::models::{Board, BoardList, Card, Contract, Invite, Permission, Profile, Role, TeamMember, Transaction};

/// Which channel a frame arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Organization,
    User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListRef {
    pub id: String,
    #[serde(default)]
    pub board_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardRef {
    pub id: String,
    #[serde(default)]
    pub list_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleChange {
    pub member_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRevoked {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Tenant-scoped changes broadcast to every client of the organization.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OrgEvent {
    #[serde(rename = "BOARD_CREATED")]
    BoardCreated(Board),
    #[serde(rename = "BOARD_UPDATED")]
    BoardUpdated(Board),
    #[serde(rename = "BOARD_DELETED")]
    BoardDeleted(EntityRef),
    #[serde(rename = "LIST_CREATED")]
    ListCreated(BoardList),
    #[serde(rename = "LIST_UPDATED")]
    ListUpdated(BoardList),
    #[serde(rename = "LIST_DELETED")]
    ListDeleted(ListRef),
    #[serde(rename = "CARD_CREATED")]
    CardCreated(Card),
    #[serde(rename = "CARD_UPDATED")]
    CardUpdated(Card),
    #[serde(rename = "CARD_DELETED")]
    CardDeleted(CardRef),
    #[serde(rename = "CONTRACT_CREATED")]
    ContractCreated(Contract),
    #[serde(rename = "CONTRACT_UPDATED")]
    ContractUpdated(Contract),
    #[serde(rename = "CONTRACT_DELETED")]
    ContractDeleted(EntityRef),
    #[serde(rename = "TRANSACTION_CREATED")]
    TransactionCreated(Transaction),
    #[serde(rename = "TRANSACTION_UPDATED")]
    TransactionUpdated(Transaction),
    #[serde(rename = "TRANSACTION_DELETED")]
    TransactionDeleted(EntityRef),
    #[serde(rename = "INVITE_CREATED")]
    InviteCreated(Invite),
    #[serde(rename = "INVITE_UPDATED")]
    InviteUpdated(Invite),
    #[serde(rename = "INVITE_DELETED")]
    InviteDeleted(EntityRef),
    #[serde(rename = "MEMBER_JOINED")]
    MemberJoined(TeamMember),
    #[serde(rename = "MEMBER_UPDATED")]
    MemberUpdated(TeamMember),
    #[serde(rename = "MEMBER_REMOVED")]
    MemberRemoved(EntityRef),
    #[serde(rename = "PERMISSION_UPDATED")]
    PermissionUpdated(Permission),
}

/// Identity-scoped changes delivered only to the affected user.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum UserEvent {
    #[serde(rename = "PROFILE_UPDATED")]
    ProfileUpdated(Profile),
    #[serde(rename = "INVITE_RECEIVED")]
    InviteReceived(Invite),
    #[serde(rename = "ROLE_CHANGED")]
    RoleChanged(RoleChange),
    #[serde(rename = "SESSION_REVOKED")]
    SessionRevoked(SessionRevoked),
}

/// Tags recognized on the organization channel, for telling an unknown tag
/// apart from a malformed payload of a known one.
pub const ORG_TAGS: &[&str] = &[
    tags::BOARD_CREATED,
    tags::BOARD_UPDATED,
    tags::BOARD_DELETED,
    tags::LIST_CREATED,
    tags::LIST_UPDATED,
    tags::LIST_DELETED,
    tags::CARD_CREATED,
    tags::CARD_UPDATED,
    tags::CARD_DELETED,
    tags::CONTRACT_CREATED,
    tags::CONTRACT_UPDATED,
    tags::CONTRACT_DELETED,
    tags::TRANSACTION_CREATED,
    tags::TRANSACTION_UPDATED,
    tags::TRANSACTION_DELETED,
    tags::INVITE_CREATED,
    tags::INVITE_UPDATED,
    tags::INVITE_DELETED,
    tags::MEMBER_JOINED,
    tags::MEMBER_UPDATED,
    tags::MEMBER_REMOVED,
    tags::PERMISSION_UPDATED,
];

/// Tags recognized on the user channel.
pub const USER_TAGS: &[&str] = &[
    tags::PROFILE_UPDATED,
    tags::INVITE_RECEIVED,
    tags::ROLE_CHANGED,
    tags::SESSION_REVOKED,
];

impl OrgEvent {
    pub fn parse(frame: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(frame.clone())
    }

    /// Wire tag of this event, used as the stats key.
    pub fn tag(&self) -> &'static str {
        match self {
            OrgEvent::BoardCreated(_) => tags::BOARD_CREATED,
            OrgEvent::BoardUpdated(_) => tags::BOARD_UPDATED,
            OrgEvent::BoardDeleted(_) => tags::BOARD_DELETED,
            OrgEvent::ListCreated(_) => tags::LIST_CREATED,
            OrgEvent::ListUpdated(_) => tags::LIST_UPDATED,
            OrgEvent::ListDeleted(_) => tags::LIST_DELETED,
            OrgEvent::CardCreated(_) => tags::CARD_CREATED,
            OrgEvent::CardUpdated(_) => tags::CARD_UPDATED,
            OrgEvent::CardDeleted(_) => tags::CARD_DELETED,
            OrgEvent::ContractCreated(_) => tags::CONTRACT_CREATED,
            OrgEvent::ContractUpdated(_) => tags::CONTRACT_UPDATED,
            OrgEvent::ContractDeleted(_) => tags::CONTRACT_DELETED,
            OrgEvent::TransactionCreated(_) => tags::TRANSACTION_CREATED,
            OrgEvent::TransactionUpdated(_) => tags::TRANSACTION_UPDATED,
            OrgEvent::TransactionDeleted(_) => tags::TRANSACTION_DELETED,
            OrgEvent::InviteCreated(_) => tags::INVITE_CREATED,
            OrgEvent::InviteUpdated(_) => tags::INVITE_UPDATED,
            OrgEvent::InviteDeleted(_) => tags::INVITE_DELETED,
            OrgEvent::MemberJoined(_) => tags::MEMBER_JOINED,
            OrgEvent::MemberUpdated(_) => tags::MEMBER_UPDATED,
            OrgEvent::MemberRemoved(_) => tags::MEMBER_REMOVED,
            OrgEvent::PermissionUpdated(_) => tags::PERMISSION_UPDATED,
        }
    }
}

impl UserEvent {
    pub fn parse(frame: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(frame.clone())
    }

    pub fn tag(&self) -> &'static str {
        match self {
            UserEvent::ProfileUpdated(_) => tags::PROFILE_UPDATED,
            UserEvent::InviteReceived(_) => tags::INVITE_RECEIVED,
            UserEvent::RoleChanged(_) => tags::ROLE_CHANGED,
            UserEvent::SessionRevoked(_) => tags::SESSION_REVOKED,
        }
    }
}
