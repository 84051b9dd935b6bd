//! Team, invite and permission endpoints.

use serde::Serialize;

use crate::models::{Invite, Permission, Role, TeamMember};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Serialize)]
pub struct SendInviteRequest {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMemberRoleRequest {
    pub role: Role,
}

impl ApiClient {
    pub async fn list_members(&self) -> Result<Vec<TeamMember>, ApiError> {
        self.get("/members").await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        self.get("/permissions").await
    }

    pub async fn list_invites(&self) -> Result<Vec<Invite>, ApiError> {
        self.get("/invites").await
    }

    pub async fn send_invite(&self, req: &SendInviteRequest) -> Result<Invite, ApiError> {
        self.post("/invites", req).await
    }

    pub async fn revoke_invite(&self, id: &str) -> Result<Invite, ApiError> {
        self.post(&format!("/invites/{id}/revoke"), &serde_json::json!({}))
            .await
    }

    pub async fn update_member_role(
        &self,
        id: &str,
        req: &UpdateMemberRoleRequest,
    ) -> Result<TeamMember, ApiError> {
        self.put(&format!("/members/{id}/role"), req).await
    }

    pub async fn remove_member(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/members/{id}")).await
    }
}
