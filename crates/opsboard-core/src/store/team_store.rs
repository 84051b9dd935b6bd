//! Team members, invites and permissions.

use crate::models::{Invite, InviteStatus, Permission, TeamMember};
use crate::store::Collection;

#[derive(Debug, Default)]
pub struct TeamStore {
    pub members: Collection<TeamMember>,
    pub invites: Collection<Invite>,
    pub permissions: Collection<Permission>,
}

impl TeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members_by_name(&self) -> Vec<&TeamMember> {
        let mut members: Vec<&TeamMember> = self.members.iter().collect();
        members.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        members
    }

    pub fn pending_invites(&self) -> Vec<&Invite> {
        let mut invites: Vec<&Invite> = self
            .invites
            .iter()
            .filter(|i| i.status == InviteStatus::Pending)
            .collect();
        invites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        invites
    }

    pub fn permissions_for(&self, member_id: &str) -> Vec<&Permission> {
        let mut perms: Vec<&Permission> = self
            .permissions
            .iter()
            .filter(|p| p.member_id == member_id)
            .collect();
        perms.sort_by(|a, b| a.resource.cmp(&b.resource));
        perms
    }

    pub fn can_write(&self, member_id: &str, resource: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p.member_id == member_id && p.resource == resource && p.can_write)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.invites.clear();
        self.permissions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn member(id: &str, name: &str) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            user_id: format!("u-{id}"),
            display_name: name.to_string(),
            email: format!("{id}@example.test"),
            role: Role::Member,
            joined_at: Utc::now(),
        }
    }

    fn permission(id: &str, member: &str, resource: &str, write: bool) -> Permission {
        Permission {
            id: id.to_string(),
            member_id: member.to_string(),
            resource: resource.to_string(),
            can_read: true,
            can_write: write,
        }
    }

    #[test]
    fn members_sort_by_display_name() {
        let mut store = TeamStore::new();
        store.members.insert_if_absent(member("m1", "Zoe"));
        store.members.insert_if_absent(member("m2", "Ada"));
        let names: Vec<&str> = store
            .members_by_name()
            .iter()
            .map(|m| m.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Zoe"]);
    }

    #[test]
    fn write_permission_is_member_and_resource_scoped() {
        let mut store = TeamStore::new();
        store
            .permissions
            .insert_if_absent(permission("p1", "m1", "boards", true));
        store
            .permissions
            .insert_if_absent(permission("p2", "m1", "contracts", false));

        assert!(store.can_write("m1", "boards"));
        assert!(!store.can_write("m1", "contracts"));
        assert!(!store.can_write("m2", "boards"));
    }
}
