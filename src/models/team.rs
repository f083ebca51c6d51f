use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access tier; only admins may alter team membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Contributor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Contributor => "contributor",
        }
    }

    pub fn toggled(&self) -> Role {
        match self {
            Role::Admin => Role::Contributor,
            Role::Contributor => Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Contributor
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "contributor" => Ok(Role::Contributor),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Row of the `user_roles` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRole {
    pub user_id: String,
    pub role: Role,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Role row joined with the member's email for display
#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
pub struct TeamMember {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl TeamMember {
    /// First letter of the email, shown in the avatar bubble
    pub fn initial(&self) -> String {
        self.email
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TeamOverview {
    pub members: Vec<TeamMember>,
    pub current_role: Role,
    pub invites: Vec<Invite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
}

/// Row of the `invites` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct Invite {
    pub id: String,
    pub email: String,
    pub invited_by: String,
    pub status: InviteStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInvite {
    pub id: String,
    pub email: String,
    pub invited_by: String,
    pub status: InviteStatus,
}

impl NewInvite {
    pub fn pending(email: &str, invited_by: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            invited_by: invited_by.to_string(),
            status: InviteStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct InviteRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RoleChangeRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_and_toggle() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Contributor).unwrap(), "\"contributor\"");
        assert_eq!(Role::Admin.toggled(), Role::Contributor);
        assert_eq!(Role::Contributor.toggled(), Role::Admin);
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_member_initial() {
        let mut member = TeamMember {
            id: "u1".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
            created_at: "2024-01-01T00:00:00Z".into(),
        };
        assert_eq!(member.initial(), "A");
        member.email.clear();
        assert_eq!(member.initial(), "U");
    }

    #[test]
    fn test_new_invite_normalises_email() {
        let invite = NewInvite::pending("  New.Person@Example.com ", "admin-1");
        assert_eq!(invite.email, "new.person@example.com");
        assert_eq!(invite.status, InviteStatus::Pending);
        assert_eq!(invite.invited_by, "admin-1");
    }
}
