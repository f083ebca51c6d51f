use crate::constants::messages;
use crate::models::{
    AuthUser, Invite, InviteStatus, NewInvite, Role, SessionUser, TeamMember, TeamOverview, UserRole,
};
use crate::services::backend::Backend;
use crate::utils::{is_valid_email, AppError};

/// Result of a successful invite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteOutcome {
    /// Row stored and the platform sent the invitation email
    EmailSent,
    /// Row stored, the email could not be sent; the person can still sign up
    Saved,
}

impl InviteOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            InviteOutcome::EmailSent => messages::INVITE_SENT,
            InviteOutcome::Saved => messages::INVITE_SAVED,
        }
    }
}

/// Role of `user_id`; users without a row are contributors
pub fn current_role(roles: &[UserRole], user_id: &str) -> Role {
    roles
        .iter()
        .find(|r| r.user_id == user_id)
        .map(|r| r.role)
        .unwrap_or_default()
}

/// Joins role rows with auth users for display.
///
/// Without the admin user list only the current user's email is known; the
/// other rows show "User". With it, unknown ids show "Unknown".
pub fn merge_members(roles: &[UserRole], users: Option<&[AuthUser]>, current: &SessionUser) -> Vec<TeamMember> {
    roles
        .iter()
        .map(|role| {
            let is_self = role.user_id == current.id;
            let email = match users {
                Some(users) => users
                    .iter()
                    .find(|u| u.id == role.user_id)
                    .and_then(|u| u.email.clone())
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| {
                        if is_self {
                            current.email.clone()
                        } else {
                            "Unknown".to_string()
                        }
                    }),
                None if is_self => current.email.clone(),
                None => "User".to_string(),
            };

            TeamMember {
                id: role.user_id.clone(),
                email,
                role: role.role,
                created_at: role.created_at.clone(),
            }
        })
        .collect()
}

pub async fn load_team(backend: &dyn Backend, user: &SessionUser) -> Result<TeamOverview, AppError> {
    let roles = backend.list_user_roles(&user.access_token).await?;

    let users = match backend.list_users().await {
        Ok(users) => Some(users),
        Err(e) => {
            log::info!("ℹ️  Cannot access admin API, showing role data only: {}", e);
            None
        }
    };

    let members = merge_members(&roles, users.as_deref(), user);
    let current_role = current_role(&roles, &user.id);

    let invites = match backend.list_invites(&user.access_token).await {
        Ok(invites) => invites
            .into_iter()
            .filter(|i| i.status == InviteStatus::Pending)
            .collect(),
        Err(e) => {
            log::warn!("⚠️ Failed to load invites: {}", e);
            Vec::new()
        }
    };

    log::info!("👥 Loaded {} team members for user {} ({})", members.len(), user.id, current_role);

    Ok(TeamOverview {
        members,
        current_role,
        invites,
    })
}

/// Changes another member's role. Only admins may do this and never on themselves;
/// both checks run before anything is written.
pub async fn change_role(
    backend: &dyn Backend,
    actor: &SessionUser,
    target_user_id: &str,
    new_role: Role,
) -> Result<Role, AppError> {
    let roles = backend.list_user_roles(&actor.access_token).await?;

    if !current_role(&roles, &actor.id).is_admin() {
        log::warn!("⚠️ User {} tried to change a role without admin rights", actor.id);
        return Err(AppError::Forbidden(messages::ROLE_ONLY_ADMINS.to_string()));
    }

    if target_user_id == actor.id {
        return Err(AppError::Forbidden(messages::ROLE_SELF.to_string()));
    }

    if !roles.iter().any(|r| r.user_id == target_user_id) {
        return Err(AppError::NotFound(format!("Team member {} not found", target_user_id)));
    }

    backend
        .update_user_role(&actor.access_token, target_user_id, new_role)
        .await?;

    log::info!("✅ Role of {} updated to {} by {}", target_user_id, new_role, actor.id);
    Ok(new_role)
}

pub async fn invite_member(
    backend: &dyn Backend,
    actor: &SessionUser,
    email: &str,
) -> Result<(Invite, InviteOutcome), AppError> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(AppError::InvalidRequest(messages::INVALID_EMAIL.to_string()));
    }

    let roles = backend.list_user_roles(&actor.access_token).await?;
    if !current_role(&roles, &actor.id).is_admin() {
        return Err(AppError::Forbidden(messages::INVITE_ONLY_ADMINS.to_string()));
    }

    let new_invite = NewInvite::pending(email, &actor.id);

    let existing = backend.list_invites(&actor.access_token).await?;
    if existing
        .iter()
        .any(|i| i.status == InviteStatus::Pending && i.email.eq_ignore_ascii_case(&new_invite.email))
    {
        return Err(AppError::InvalidRequest(messages::INVITE_DUPLICATE.to_string()));
    }

    let invite = backend.insert_invite(&actor.access_token, &new_invite).await?;

    let outcome = match backend.invite_user_by_email(&invite.email).await {
        Ok(()) => InviteOutcome::EmailSent,
        Err(e) => {
            log::warn!("⚠️ Invite for {} saved but email not sent: {}", invite.email, e);
            InviteOutcome::Saved
        }
    };

    log::info!("📨 Invite {} created by {} ({:?})", invite.id, actor.id, outcome);
    Ok((invite, outcome))
}

pub async fn revoke_invite(backend: &dyn Backend, actor: &SessionUser, invite_id: &str) -> Result<(), AppError> {
    let roles = backend.list_user_roles(&actor.access_token).await?;
    if !current_role(&roles, &actor.id).is_admin() {
        return Err(AppError::Forbidden(messages::INVITE_ONLY_ADMINS.to_string()));
    }

    let invites = backend.list_invites(&actor.access_token).await?;
    let pending = invites
        .iter()
        .any(|i| i.id == invite_id && i.status == InviteStatus::Pending);
    if !pending {
        log::warn!("⚠️ Invite {} is not pending, nothing to revoke", invite_id);
        return Err(AppError::NotFound(messages::INVITE_NOT_PENDING.to_string()));
    }

    backend.delete_invite(&actor.access_token, invite_id).await?;
    log::info!("🗑️  Invite {} revoked by {}", invite_id, actor.id);
    Ok(())
}
