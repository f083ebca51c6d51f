use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::safe_get_hostname;

/// Liveness plus what the dashboard knows about its platform setup
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Host of the configured platform project
    #[schema(example = "abc.supabase.co")]
    pub platform: String,
    /// Whether member emails and invitation emails can use the admin API
    pub admin_api: bool,
    pub timestamp: i64,
}

impl HealthResponse {
    fn for_state(state: &AppState) -> Self {
        Self {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: safe_get_hostname(&state.config.supabase_url, "unknown"),
            admin_api: state.config.supabase_service_role_key.is_some(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::for_state(&state))
}
