use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::TeamMemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Owner,
    Admin,
    Moderator,
    Support,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Owner => "owner",
            TeamRole::Admin => "admin",
            TeamRole::Moderator => "moderator",
            TeamRole::Support => "support",
        }
    }

    /// Permissions granted to a fresh member in this role.
    pub fn default_permissions(&self) -> Vec<String> {
        let perms: &[&str] = match self {
            TeamRole::Owner => &["*"],
            TeamRole::Admin => &["users.manage", "streams.manage", "reports.manage", "team.manage", "settings.edit"],
            TeamRole::Moderator => &["users.warn", "streams.manage", "reports.manage", "chat.manage"],
            TeamRole::Support => &["reports.view", "users.view"],
        };
        perms.iter().map(|p| p.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Invited,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Invited => "invited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub email: String,
    pub role: TeamRole,
    pub status: MemberStatus,
    /// Free-form permission keys, not a closed set.
    pub permissions: Vec<String>,
    pub actions_taken: u32,
    pub joined_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl TeamMember {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == "*" || p == permission)
    }
}

/// Input for inviting someone to the moderation team
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct InviteMember {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: TeamRole,
}

impl InviteMember {
    pub fn into_member(self, invited_at: DateTime<Utc>) -> TeamMember {
        TeamMember {
            id: TeamMemberId::new(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            permissions: self.role.default_permissions(),
            role: self.role,
            status: MemberStatus::Invited,
            actions_taken: 0,
            joined_at: invited_at,
            last_active_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_validation() {
        let ok = InviteMember {
            name: "Sam".to_string(),
            email: "sam@studio.dev".to_string(),
            role: TeamRole::Moderator,
        };
        assert!(ok.validate().is_ok());

        let blank = InviteMember {
            name: String::new(),
            email: "not-an-email".to_string(),
            role: TeamRole::Support,
        };
        let errors = blank.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_owner_wildcard_permission() {
        let member = InviteMember {
            name: "Owner".to_string(),
            email: "owner@studio.dev".to_string(),
            role: TeamRole::Owner,
        }
        .into_member(Utc::now());
        assert!(member.has_permission("anything.at.all"));
        assert_eq!(member.status, MemberStatus::Invited);
    }
}
