use async_trait::async_trait;

use crate::models::{AuthUser, Insight, Invite, NewInsight, NewInvite, Role, Session, UserRole};
use crate::utils::AppError;

/// Everything the dashboard asks of the hosted platform.
///
/// Calls that act on behalf of the signed-in user take their access token so
/// the platform's row-level policies decide what is visible. The admin calls
/// (`list_users`, `invite_user_by_email`) use the service-role key and fail
/// when it is not configured.
#[async_trait]
pub trait Backend: Send + Sync {
    // ==================== AUTH ====================

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AppError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AppError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError>;

    // ==================== ADMIN ====================

    async fn list_users(&self) -> Result<Vec<AuthUser>, AppError>;

    async fn invite_user_by_email(&self, email: &str) -> Result<(), AppError>;

    // ==================== INSIGHTS ====================

    /// Rows owned by `owner_id`, newest first
    async fn list_insights(&self, access_token: &str, owner_id: &str) -> Result<Vec<Insight>, AppError>;

    async fn insert_insight(
        &self,
        access_token: &str,
        owner_id: &str,
        insight: &NewInsight,
    ) -> Result<Insight, AppError>;

    async fn update_insight_note(
        &self,
        access_token: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<(), AppError>;

    async fn delete_insight(&self, access_token: &str, id: &str) -> Result<(), AppError>;

    // ==================== TEAM ====================

    /// All role rows, oldest first
    async fn list_user_roles(&self, access_token: &str) -> Result<Vec<UserRole>, AppError>;

    async fn update_user_role(&self, access_token: &str, user_id: &str, role: Role) -> Result<(), AppError>;

    /// All invites, newest first
    async fn list_invites(&self, access_token: &str) -> Result<Vec<Invite>, AppError>;

    async fn insert_invite(&self, access_token: &str, invite: &NewInvite) -> Result<Invite, AppError>;

    async fn delete_invite(&self, access_token: &str, id: &str) -> Result<(), AppError>;
}
