//! Application-wide constants
//!
//! Centralized location for magic strings and configuration values
//! that are used across multiple modules.

/// Default REST API base URL
pub const API_BASE_URL: &str = "https://api.opsboard.app/v1";

/// Topic prefix for the organization-scoped realtime channel
pub const ORG_TOPIC_PREFIX: &str = "org:";

/// Topic prefix for the user-scoped realtime channel
pub const USER_TOPIC_PREFIX: &str = "user:";

/// Interval at which the realtime watchdog re-checks channel membership
pub const CHANNEL_WATCHDOG_INTERVAL_MS: u64 = 5_000;

// Freshness defaults (seconds)
/// Transactional data (transactions, contracts) is trusted this long
pub const RECORDS_FRESH_FOR_SECS: u64 = 5 * 60; // 5 minutes
/// Board data is trusted this long
pub const BOARDS_FRESH_FOR_SECS: u64 = 5 * 60;
/// Team/invite/permission data changes rarely
pub const TEAM_FRESH_FOR_SECS: u64 = 15 * 60;
/// Age past which a silent background refresh is kicked for any store
pub const SILENT_REFRESH_AFTER_SECS: u64 = 2 * 60;

/// File name of the persisted board preferences, under `CoreConfig::data_dir`
pub const BOARD_PREFS_FILE: &str = "board_prefs.json";

// Realtime event tags recognized on each channel. The dispatcher matches on
// the typed enums in `realtime::event`; these mirror the wire strings for
// logging and stats keys.
pub mod tags {
    pub const BOARD_CREATED: &str = "BOARD_CREATED";
    pub const BOARD_UPDATED: &str = "BOARD_UPDATED";
    pub const BOARD_DELETED: &str = "BOARD_DELETED";
    pub const LIST_CREATED: &str = "LIST_CREATED";
    pub const LIST_UPDATED: &str = "LIST_UPDATED";
    pub const LIST_DELETED: &str = "LIST_DELETED";
    pub const CARD_CREATED: &str = "CARD_CREATED";
    pub const CARD_UPDATED: &str = "CARD_UPDATED";
    pub const CARD_DELETED: &str = "CARD_DELETED";
    pub const CONTRACT_CREATED: &str = "CONTRACT_CREATED";
    pub const CONTRACT_UPDATED: &str = "CONTRACT_UPDATED";
    pub const CONTRACT_DELETED: &str = "CONTRACT_DELETED";
    pub const TRANSACTION_CREATED: &str = "TRANSACTION_CREATED";
    pub const TRANSACTION_UPDATED: &str = "TRANSACTION_UPDATED";
    pub const TRANSACTION_DELETED: &str = "TRANSACTION_DELETED";
    pub const INVITE_CREATED: &str = "INVITE_CREATED";
    pub const INVITE_UPDATED: &str = "INVITE_UPDATED";
    pub const INVITE_DELETED: &str = "INVITE_DELETED";
    pub const MEMBER_JOINED: &str = "MEMBER_JOINED";
    pub const MEMBER_UPDATED: &str = "MEMBER_UPDATED";
    pub const MEMBER_REMOVED: &str = "MEMBER_REMOVED";
    pub const PERMISSION_UPDATED: &str = "PERMISSION_UPDATED";

    pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";
    pub const INVITE_RECEIVED: &str = "INVITE_RECEIVED";
    pub const ROLE_CHANGED: &str = "ROLE_CHANGED";
    pub const SESSION_REVOKED: &str = "SESSION_REVOKED";
}
