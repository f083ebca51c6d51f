use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde::Serialize;

use crate::models::{
    Insight, Invite, InviteRequest, NewInsight, NoteUpdate, Role, RoleChangeRequest, SessionUser, TeamMember,
};
use crate::services::insight_service::{self, InsightStats};
use crate::services::team_service;
use crate::state::AppState;
use crate::utils::AppError;

fn logged(error: AppError) -> AppError {
    match &error {
        AppError::Remote(_) | AppError::Transport(_) | AppError::Config(_) => {
            log::error!("❌ API request failed: {}", error)
        }
        _ => log::warn!("⚠️ API request rejected: {}", error),
    }
    error
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InsightListResponse {
    pub success: bool,
    pub insights: Vec<Insight>,
    pub total: usize,
    pub stats: InsightStats,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InsightResponse {
    pub success: bool,
    pub insight: Insight,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NoteResponse {
    pub success: bool,
    pub id: String,
    pub note: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub success: bool,
    pub members: Vec<TeamMember>,
    pub current_role: Role,
    pub invites: Vec<Invite>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoleResponse {
    pub success: bool,
    pub user_id: String,
    pub role: Role,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InviteResponse {
    pub success: bool,
    pub invite: Invite,
    /// False when the row was stored but the platform could not send the email
    pub email_sent: bool,
    pub message: String,
}

// ==================== INSIGHTS ====================

/// GET /api/v1/insights - current user's insights, newest first
#[utoipa::path(
    get,
    path = "/api/v1/insights",
    tag = "Insights",
    responses(
        (status = 200, description = "Insights of the signed-in user", body = InsightListResponse),
        (status = 401, description = "Missing or invalid session")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("")]
pub async fn list_insights(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
) -> Result<HttpResponse, AppError> {
    let insights = insight_service::load_insights(state.backend(), &user)
        .await
        .map_err(logged)?;
    let stats = insight_service::stats(&insights, chrono::Utc::now());

    Ok(HttpResponse::Ok().json(InsightListResponse {
        success: true,
        total: insights.len(),
        insights,
        stats,
    }))
}

/// POST /api/v1/insights - capture from the browser extension
#[utoipa::path(
    post,
    path = "/api/v1/insights",
    tag = "Insights",
    request_body = NewInsight,
    responses(
        (status = 201, description = "Insight stored", body = InsightResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[post("")]
pub async fn create_insight(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    request: web::Json<NewInsight>,
) -> Result<HttpResponse, AppError> {
    let insight = insight_service::create_insight(state.backend(), &user, request.into_inner())
        .await
        .map_err(logged)?;

    Ok(HttpResponse::Created().json(InsightResponse {
        success: true,
        insight,
    }))
}

/// PATCH /api/v1/insights/{id} - set or clear the note
#[utoipa::path(
    patch,
    path = "/api/v1/insights/{id}",
    tag = "Insights",
    params(("id" = String, Path, description = "Insight id")),
    request_body = NoteUpdate,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 401, description = "Missing or invalid session")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[patch("/{id}")]
pub async fn update_note(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    path: web::Path<String>,
    request: web::Json<NoteUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let note = insight_service::annotate_insight(state.backend(), &user, &id, request.note.as_deref())
        .await
        .map_err(logged)?;

    Ok(HttpResponse::Ok().json(NoteResponse {
        success: true,
        id,
        note,
    }))
}

/// DELETE /api/v1/insights/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/insights/{id}",
    tag = "Insights",
    params(("id" = String, Path, description = "Insight id")),
    responses(
        (status = 200, description = "Insight deleted", body = DeleteResponse),
        (status = 401, description = "Missing or invalid session")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[delete("/{id}")]
pub async fn delete_insight(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    insight_service::delete_insight(state.backend(), &user, &id)
        .await
        .map_err(logged)?;

    Ok(HttpResponse::Ok().json(DeleteResponse { success: true, id }))
}

// ==================== TEAM ====================

/// GET /api/v1/team - members, current role and pending invites
#[utoipa::path(
    get,
    path = "/api/v1/team",
    tag = "Team",
    responses(
        (status = 200, description = "Team overview", body = TeamResponse),
        (status = 401, description = "Missing or invalid session")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[get("")]
pub async fn get_team(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
) -> Result<HttpResponse, AppError> {
    let team = team_service::load_team(state.backend(), &user)
        .await
        .map_err(logged)?;

    Ok(HttpResponse::Ok().json(TeamResponse {
        success: true,
        members: team.members,
        current_role: team.current_role,
        invites: team.invites,
    }))
}

/// PUT /api/v1/team/{user_id}/role - admins only, never on themselves
#[utoipa::path(
    put,
    path = "/api/v1/team/{user_id}/role",
    tag = "Team",
    params(("user_id" = String, Path, description = "Member to update")),
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 403, description = "Caller is not an admin or targets themselves"),
        (status = 404, description = "Unknown member")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[put("/{user_id}/role")]
pub async fn change_role(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    path: web::Path<String>,
    request: web::Json<RoleChangeRequest>,
) -> Result<HttpResponse, AppError> {
    let target = path.into_inner();
    let role = team_service::change_role(state.backend(), &user, &target, request.role)
        .await
        .map_err(logged)?;

    Ok(HttpResponse::Ok().json(RoleResponse {
        success: true,
        user_id: target,
        role,
    }))
}

/// POST /api/v1/team/invites - admins only
#[utoipa::path(
    post,
    path = "/api/v1/team/invites",
    tag = "Team",
    request_body = InviteRequest,
    responses(
        (status = 201, description = "Invite stored", body = InviteResponse),
        (status = 400, description = "Invalid email or invite already pending"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
#[post("/invites")]
pub async fn create_invite(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    request: web::Json<InviteRequest>,
) -> Result<HttpResponse, AppError> {
    let (invite, outcome) = team_service::invite_member(state.backend(), &user, &request.email)
        .await
        .map_err(logged)?;

    Ok(HttpResponse::Created().json(InviteResponse {
        success: true,
        invite,
        email_sent: outcome == team_service::InviteOutcome::EmailSent,
        message: outcome.message().to_string(),
    }))
}
