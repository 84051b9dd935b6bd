//! Routes inbound realtime frames into the stores.
//!
//! Dispatch is a pure lookup from the frame's tag to one merge handler.
//! Handlers are synchronous, idempotent by id, and never fail: a malformed
//! frame or unknown tag is counted and dropped so one bad message cannot
//! break delivery of the ones behind it.

use serde_json::Value;

use crate::notices::NoticeSender;
use crate::store::Stores;

use super::event::{ChannelKind, OrgEvent, UserEvent, ORG_TAGS, USER_TAGS};
use super::stats::SharedRealtimeStats;

pub fn dispatch_frame(
    stores: &mut Stores,
    notices: &NoticeSender,
    stats: &SharedRealtimeStats,
    channel: ChannelKind,
    frame: &Value,
) {
    let Some(tag) = frame.get("event").and_then(Value::as_str) else {
        stats.record_malformed();
        tracing::debug!("dropping frame without event tag");
        return;
    };

    match channel {
        ChannelKind::Organization => match OrgEvent::parse(frame) {
            Ok(event) => {
                stats.record_dispatched(event.tag());
                apply_org_event(stores, event);
            }
            Err(e) => drop_unparsed(stats, ORG_TAGS, tag, e),
        },
        ChannelKind::User => match UserEvent::parse(frame) {
            Ok(event) => {
                stats.record_dispatched(event.tag());
                apply_user_event(stores, notices, event);
            }
            Err(e) => drop_unparsed(stats, USER_TAGS, tag, e),
        },
    }
}

/// A frame that did not parse is either a known tag with a bad payload or a
/// tag outside the closed set; both are ignored, counted separately.
fn drop_unparsed(
    stats: &SharedRealtimeStats,
    known_tags: &[&str],
    tag: &str,
    error: serde_json::Error,
) {
    if known_tags.contains(&tag) {
        stats.record_malformed();
        tracing::warn!("malformed {} payload: {}", tag, error);
    } else {
        stats.record_unknown_tag();
        tracing::debug!("ignoring unrecognized event tag {}", tag);
    }
}

/// Merge one organization-channel event. Exhaustive over the closed tag
/// set; merge semantics are insert-if-absent for creates, replace-or-insert
/// for updates, remove-if-present for deletes.
pub fn apply_org_event(stores: &mut Stores, event: OrgEvent) {
    match event {
        OrgEvent::BoardCreated(board) => {
            stores.boards.boards.insert_if_absent(board);
            stores.boards.reconcile_selection();
        }
        OrgEvent::BoardUpdated(board) => {
            stores.boards.boards.upsert(board);
        }
        OrgEvent::BoardDeleted(board) => {
            stores.boards.remove_board(&board.id);
        }

        // List and card events are parent-scoped: when the owning board or
        // list is not loaded the event is a no-op, never an error.
        OrgEvent::ListCreated(list) => {
            if stores.boards.is_board_loaded(&list.board_id) {
                stores.boards.lists.insert_if_absent(list);
            }
        }
        OrgEvent::ListUpdated(list) => {
            if stores.boards.is_board_loaded(&list.board_id) {
                stores.boards.lists.upsert(list);
            }
        }
        OrgEvent::ListDeleted(list) => {
            stores.boards.remove_list(&list.id);
        }
        OrgEvent::CardCreated(card) => {
            if stores.boards.is_list_loaded(&card.list_id) {
                stores.boards.cards.insert_if_absent(card);
            }
        }
        OrgEvent::CardUpdated(card) => {
            if stores.boards.is_list_loaded(&card.list_id) {
                stores.boards.cards.upsert(card);
            }
        }
        OrgEvent::CardDeleted(card) => {
            stores.boards.cards.remove(&card.id);
        }

        OrgEvent::ContractCreated(contract) => {
            stores.contracts.contracts.insert_if_absent(contract);
        }
        OrgEvent::ContractUpdated(contract) => {
            stores.contracts.contracts.upsert(contract);
        }
        OrgEvent::ContractDeleted(contract) => {
            stores.contracts.contracts.remove(&contract.id);
        }

        OrgEvent::TransactionCreated(tx) => {
            stores.transactions.transactions.insert_if_absent(tx);
        }
        OrgEvent::TransactionUpdated(tx) => {
            stores.transactions.transactions.upsert(tx);
        }
        OrgEvent::TransactionDeleted(tx) => {
            stores.transactions.transactions.remove(&tx.id);
        }

        OrgEvent::InviteCreated(invite) => {
            stores.team.invites.insert_if_absent(invite);
        }
        OrgEvent::InviteUpdated(invite) => {
            stores.team.invites.upsert(invite);
        }
        OrgEvent::InviteDeleted(invite) => {
            stores.team.invites.remove(&invite.id);
        }

        OrgEvent::MemberJoined(member) => {
            stores.team.members.insert_if_absent(member);
        }
        OrgEvent::MemberUpdated(member) => {
            stores.team.members.upsert(member);
        }
        OrgEvent::MemberRemoved(member) => {
            stores.team.members.remove(&member.id);
        }

        OrgEvent::PermissionUpdated(permission) => {
            stores.team.permissions.upsert(permission);
        }
    }
}

/// Merge one user-channel event.
pub fn apply_user_event(stores: &mut Stores, notices: &NoticeSender, event: UserEvent) {
    match event {
        UserEvent::ProfileUpdated(profile) => {
            stores.profile = Some(profile);
        }
        UserEvent::InviteReceived(invite) => {
            notices.info(format!("You have been invited as {:?}", invite.role));
        }
        UserEvent::RoleChanged(change) => {
            if let Some(member) = stores.team.members.get_mut(&change.member_id) {
                member.role = change.role;
            }
            notices.info("Your role in this organization changed");
        }
        UserEvent::SessionRevoked(revoked) => {
            stores.session_revoked = true;
            notices.error(
                revoked
                    .reason
                    .unwrap_or_else(|| "Your session was revoked".to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Board, BoardList, Card};
    use crate::notices;
    use chrono::Utc;
    use serde_json::json;

    fn setup() -> (Stores, NoticeSender, SharedRealtimeStats) {
        let (tx, rx) = notices::channel();
        // Keep the receiver alive for the duration of the test.
        std::mem::forget(rx);
        (Stores::new(None), tx, SharedRealtimeStats::new())
    }

    fn loaded_stores() -> Stores {
        let mut stores = Stores::new(None);
        stores.boards.boards.insert_if_absent(Board {
            id: "b1".to_string(),
            title: "Pipeline".to_string(),
            position: 1.0,
            archived: false,
            created_at: Utc::now(),
        });
        stores.boards.populate_board(
            "b1",
            vec![BoardList {
                id: "l1".to_string(),
                board_id: "b1".to_string(),
                title: "Todo".to_string(),
                position: 1.0,
            }],
            vec![],
        );
        stores
    }

    fn card_frame(tag: &str, id: &str, list: &str) -> Value {
        json!({
            "event": tag,
            "data": {
                "id": id,
                "list_id": list,
                "title": "t",
                "position": 1.0,
                "created_at": "2026-08-01T10:00:00Z",
                "updated_at": "2026-08-01T10:00:00Z"
            }
        })
    }

    #[test]
    fn duplicate_created_delivery_yields_one_item() {
        let (_, tx, stats) = setup();
        let mut stores = loaded_stores();
        let frame = card_frame("CARD_CREATED", "c1", "l1");

        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);

        assert_eq!(stores.boards.cards.len(), 1);
        assert_eq!(stats.snapshot().by_tag.get("CARD_CREATED"), Some(&2));
    }

    #[test]
    fn updated_for_unknown_id_inserts_as_create() {
        let (_, tx, stats) = setup();
        let mut stores = loaded_stores();
        let frame = card_frame("CARD_UPDATED", "never-seen", "l1");

        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);
        assert!(stores.boards.cards.contains("never-seen"));
    }

    #[test]
    fn deleted_for_absent_id_is_noop() {
        let (mut stores, tx, stats) = setup();
        let frame = json!({ "event": "CARD_DELETED", "data": { "id": "ghost" } });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);
        assert!(stores.boards.cards.is_empty());
    }

    #[test]
    fn card_event_for_unloaded_list_is_noop() {
        let (mut stores, tx, stats) = setup();
        let frame = card_frame("CARD_CREATED", "c1", "not-loaded");
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);
        assert!(stores.boards.cards.is_empty());
    }

    #[test]
    fn unknown_tag_is_counted_and_ignored() {
        let (mut stores, tx, stats) = setup();
        let frame = json!({ "event": "CARD_EXPLODED", "data": { "id": "c1" } });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);

        assert!(stores.boards.cards.is_empty());
        assert_eq!(stats.snapshot().unknown_tags, 1);
    }

    #[test]
    fn malformed_payload_of_known_tag_is_counted_separately() {
        let (mut stores, tx, stats) = setup();
        let frame = json!({ "event": "CARD_CREATED", "data": { "nope": true } });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);
        assert_eq!(stats.snapshot().malformed, 1);
    }

    #[test]
    fn frame_without_tag_is_malformed() {
        let (mut stores, tx, stats) = setup();
        let frame = json!({ "data": { "id": "c1" } });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);
        assert_eq!(stats.snapshot().malformed, 1);
    }

    #[test]
    fn board_delete_reassigns_active_selection() {
        let (_, tx, stats) = setup();
        let mut stores = loaded_stores();
        stores.boards.boards.insert_if_absent(Board {
            id: "b2".to_string(),
            title: "Other".to_string(),
            position: 2.0,
            archived: false,
            created_at: Utc::now(),
        });
        stores.boards.selection.select("b1");

        let frame = json!({ "event": "BOARD_DELETED", "data": { "id": "b1" } });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::Organization, &frame);

        assert_eq!(stores.boards.selection.active_id(), Some("b2"));
        assert!(stores.boards.lists.is_empty());
    }

    #[test]
    fn user_channel_profile_update_lands_in_profile_slot() {
        let (mut stores, tx, stats) = setup();
        let frame = json!({
            "event": "PROFILE_UPDATED",
            "data": { "user_id": "u1", "display_name": "Ada", "email": "ada@example.test" }
        });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::User, &frame);
        assert_eq!(stores.profile.as_ref().unwrap().display_name, "Ada");
    }

    #[test]
    fn session_revoked_sets_flag_and_notifies() {
        let (tx, rx) = notices::channel();
        let mut stores = Stores::new(None);
        let stats = SharedRealtimeStats::new();
        let frame = json!({ "event": "SESSION_REVOKED", "data": { "reason": "signed in elsewhere" } });

        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::User, &frame);

        assert!(stores.session_revoked);
        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.message, "signed in elsewhere");
    }

    #[test]
    fn org_tag_on_user_channel_is_unknown_there() {
        let (mut stores, tx, stats) = setup();
        let frame = json!({ "event": "CARD_DELETED", "data": { "id": "c1" } });
        dispatch_frame(&mut stores, &tx, &stats, ChannelKind::User, &frame);
        assert_eq!(stats.snapshot().unknown_tags, 1);
    }
}
