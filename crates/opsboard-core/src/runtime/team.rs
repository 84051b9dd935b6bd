//! Invite and member operations.

use chrono::Utc;
use uuid::Uuid;

use crate::api::{SendInviteRequest, UpdateMemberRoleRequest};
use crate::error::CoreError;
use crate::models::{Invite, InviteStatus, Role};
use crate::optimistic::{EntityKey, Rollback};

use super::CoreRuntime;

impl CoreRuntime {
    /// Invite someone to the organization. Returns the invite id.
    pub async fn send_invite(
        &self,
        email: impl Into<String>,
        role: Role,
    ) -> Result<String, CoreError> {
        self.require_session()?;
        let email = email.into();
        let invite_id = format!("invite-{}", Uuid::new_v4());

        let token = {
            let mut stores = self.stores.borrow_mut();
            stores.team.invites.insert_if_absent(Invite {
                id: invite_id.clone(),
                email: email.clone(),
                role,
                status: InviteStatus::Pending,
                created_at: Utc::now(),
            });
            stores.journal.begin(EntityKey::Invite(invite_id.clone()))
        };

        let req = SendInviteRequest { email, role };
        let result = self.api.send_invite(&req).await;
        let final_id = match &result {
            Ok(invite) => invite.id.clone(),
            Err(_) => invite_id.clone(),
        };
        self.settle(
            EntityKey::Invite(invite_id.clone()),
            token,
            Rollback::of(&invite_id, None),
            result,
            &invite_id,
            "Could not send invite",
            |stores| &mut stores.team.invites,
        )?;
        Ok(final_id)
    }

    pub async fn revoke_invite(&self, invite_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.team.invites.get(invite_id).cloned();
            let Some(invite) = stores.team.invites.get_mut(invite_id) else {
                return Err(CoreError::UnknownEntity {
                    kind: "invite",
                    id: invite_id.to_string(),
                });
            };
            invite.status = InviteStatus::Revoked;
            let token = stores.journal.begin(EntityKey::Invite(invite_id.to_string()));
            (token, Rollback::of(invite_id, prior))
        };

        let result = self.api.revoke_invite(invite_id).await;
        self.settle(
            EntityKey::Invite(invite_id.to_string()),
            token,
            rollback,
            result,
            invite_id,
            "Could not revoke invite",
            |stores| &mut stores.team.invites,
        )
    }

    pub async fn update_member_role(&self, member_id: &str, role: Role) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.team.members.get(member_id).cloned();
            let Some(member) = stores.team.members.get_mut(member_id) else {
                return Err(CoreError::UnknownEntity {
                    kind: "member",
                    id: member_id.to_string(),
                });
            };
            member.role = role;
            let token = stores.journal.begin(EntityKey::Member(member_id.to_string()));
            (token, Rollback::of(member_id, prior))
        };

        let req = UpdateMemberRoleRequest { role };
        let result = self.api.update_member_role(member_id, &req).await;
        self.settle(
            EntityKey::Member(member_id.to_string()),
            token,
            rollback,
            result,
            member_id,
            "Could not change member role",
            |stores| &mut stores.team.members,
        )
    }

    pub async fn remove_member(&self, member_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let Some(prior) = stores.team.members.remove(member_id) else {
                return Err(CoreError::UnknownEntity {
                    kind: "member",
                    id: member_id.to_string(),
                });
            };
            let token = stores.journal.begin(EntityKey::Member(member_id.to_string()));
            (token, Rollback::Restore(prior))
        };

        let result = self.api.remove_member(member_id).await;
        self.settle_removal(
            EntityKey::Member(member_id.to_string()),
            token,
            rollback,
            result,
            "Could not remove member",
            |stores| &mut stores.team.members,
        )
    }
}
