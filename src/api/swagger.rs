use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Insight Capture API",
        version = "1.0.0",
        description = "JSON API of the Insight Capture dashboard, used by the browser extension.\n\n**Authentication:** every `/api/v1` endpoint requires the platform access token as a Bearer token (or the dashboard session cookie).\n\n**Features:**\n- Capture, list, annotate and delete insights\n- Team overview and role management (admins only)\n- Team invitations (admins only)\n- Health monitoring and metrics"
    ),
    paths(
        // Insights
        crate::api::rest::list_insights,
        crate::api::rest::create_insight,
        crate::api::rest::update_note,
        crate::api::rest::delete_insight,

        // Team
        crate::api::rest::get_team,
        crate::api::rest::change_role,
        crate::api::rest::create_invite,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Insights
            crate::models::Insight,
            crate::models::NewInsight,
            crate::models::NoteUpdate,
            crate::services::insight_service::InsightStats,
            crate::api::rest::InsightListResponse,
            crate::api::rest::InsightResponse,
            crate::api::rest::NoteResponse,
            crate::api::rest::DeleteResponse,

            // Team
            crate::models::Role,
            crate::models::TeamMember,
            crate::models::Invite,
            crate::models::InviteStatus,
            crate::models::InviteRequest,
            crate::models::RoleChangeRequest,
            crate::api::rest::TeamResponse,
            crate::api::rest::RoleResponse,
            crate::api::rest::InviteResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Insights", description = "Insights captured by the signed-in user."),
        (name = "Team", description = "Team members, roles and invitations."),
        (name = "Health", description = "Health check and request counters."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Platform access token of the signed-in user"))
                        .build()
                ),
            );
        }
    }
}
