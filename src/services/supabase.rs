// ==================== HOSTED PLATFORM CLIENT ====================
// GoTrue (auth) under /auth/v1 and PostgREST (tables) under /rest/v1

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::models::{AuthUser, Insight, Invite, NewInsight, NewInvite, Role, Session, UserRole};
use crate::services::backend::Backend;
use crate::utils::AppError;

const INSIGHTS_TABLE: &str = "insights";
const USER_ROLES_TABLE: &str = "user_roles";
const INVITES_TABLE: &str = "invites";

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdminUsersPage {
    #[serde(default)]
    users: Vec<AuthUser>,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            service_role_key: config.supabase_service_role_key.clone(),
        })
    }

    fn rest_url(&self, table: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.base_url, table);
        if !query.is_empty() {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request acting as the signed-in user
    fn user_request(&self, method: Method, url: &str, access_token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Accept", "application/json")
            .bearer_auth(access_token)
    }

    /// Request with the service-role key (admin API)
    fn admin_request(&self, method: Method, url: &str) -> Result<RequestBuilder, AppError> {
        let key = self
            .service_role_key
            .as_deref()
            .ok_or_else(|| AppError::Config("SUPABASE_SERVICE_ROLE_KEY is not configured".to_string()))?;

        Ok(self
            .http
            .request(method, url)
            .header("apikey", key)
            .header("Accept", "application/json")
            .bearer_auth(key))
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, AppError> {
        let url = format!("{}?grant_type={}", self.auth_url("token"), grant_type);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let session: Session = ensure_success(response).await?.json().await?;
        Ok(session)
    }
}

/// Passes 2xx responses through and turns everything else into `AppError::Remote`
async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Remote(platform_error_message(status, &body)))
}

/// Pulls the human readable part out of a GoTrue/PostgREST error body
pub(crate) fn platform_error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let detail = parsed.as_ref().and_then(|value| {
        ["message", "error_description", "msg", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|m| m.as_str()))
            .map(str::to_string)
    });

    match detail {
        Some(detail) => format!("{} (HTTP {})", detail, status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AppError> {
        log::info!("🔐 Signing in {}", email);
        self.token_grant(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AppError> {
        log::debug!("🔄 Refreshing session");
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .user_request(Method::POST, &self.auth_url("logout"), access_token)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, AppError> {
        let url = format!("{}?per_page=1000", self.auth_url("admin/users"));
        let response = self.admin_request(Method::GET, &url)?.send().await?;
        let page: AdminUsersPage = ensure_success(response).await?.json().await?;

        log::debug!("👥 Admin API returned {} users", page.users.len());
        Ok(page.users)
    }

    async fn invite_user_by_email(&self, email: &str) -> Result<(), AppError> {
        let response = self
            .admin_request(Method::POST, &self.auth_url("invite"))?
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        ensure_success(response).await?;

        log::info!("📧 Invitation email requested for {}", email);
        Ok(())
    }

    async fn list_insights(&self, access_token: &str, owner_id: &str) -> Result<Vec<Insight>, AppError> {
        let url = self.rest_url(
            INSIGHTS_TABLE,
            &[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", owner_id)),
                ("order", "created_at.desc".to_string()),
            ],
        );

        let response = self.user_request(Method::GET, &url, access_token).send().await?;
        let insights: Vec<Insight> = ensure_success(response).await?.json().await?;
        Ok(insights)
    }

    async fn insert_insight(
        &self,
        access_token: &str,
        owner_id: &str,
        insight: &NewInsight,
    ) -> Result<Insight, AppError> {
        let mut body = serde_json::to_value(insight)
            .map_err(|e| AppError::InvalidRequest(format!("Failed to encode insight: {}", e)))?;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("user_id".to_string(), serde_json::Value::from(owner_id));
        }

        let response = self
            .user_request(Method::POST, &self.rest_url(INSIGHTS_TABLE, &[]), access_token)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let mut rows: Vec<Insight> = ensure_success(response).await?.json().await?;
        if rows.is_empty() {
            return Err(AppError::Remote("Insert returned no row".to_string()));
        }
        Ok(rows.remove(0))
    }

    async fn update_insight_note(
        &self,
        access_token: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<(), AppError> {
        let url = self.rest_url(INSIGHTS_TABLE, &[("id", format!("eq.{}", id))]);

        let response = self
            .user_request(Method::PATCH, &url, access_token)
            .json(&serde_json::json!({ "note": note }))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_insight(&self, access_token: &str, id: &str) -> Result<(), AppError> {
        let url = self.rest_url(INSIGHTS_TABLE, &[("id", format!("eq.{}", id))]);

        let response = self.user_request(Method::DELETE, &url, access_token).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_user_roles(&self, access_token: &str) -> Result<Vec<UserRole>, AppError> {
        let url = self.rest_url(
            USER_ROLES_TABLE,
            &[
                ("select", "*".to_string()),
                ("order", "created_at.asc".to_string()),
            ],
        );

        let response = self.user_request(Method::GET, &url, access_token).send().await?;
        let roles: Vec<UserRole> = ensure_success(response).await?.json().await?;
        Ok(roles)
    }

    async fn update_user_role(&self, access_token: &str, user_id: &str, role: Role) -> Result<(), AppError> {
        let url = self.rest_url(USER_ROLES_TABLE, &[("user_id", format!("eq.{}", user_id))]);

        let response = self
            .user_request(Method::PATCH, &url, access_token)
            .json(&serde_json::json!({
                "role": role,
                "updated_at": chrono::Utc::now().to_rfc3339(),
            }))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_invites(&self, access_token: &str) -> Result<Vec<Invite>, AppError> {
        let url = self.rest_url(
            INVITES_TABLE,
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        );

        let response = self.user_request(Method::GET, &url, access_token).send().await?;
        let invites: Vec<Invite> = ensure_success(response).await?.json().await?;
        Ok(invites)
    }

    async fn insert_invite(&self, access_token: &str, invite: &NewInvite) -> Result<Invite, AppError> {
        let response = self
            .user_request(Method::POST, &self.rest_url(INVITES_TABLE, &[]), access_token)
            .header("Prefer", "return=representation")
            .json(invite)
            .send()
            .await?;

        let mut rows: Vec<Invite> = ensure_success(response).await?.json().await?;
        if rows.is_empty() {
            return Err(AppError::Remote("Insert returned no row".to_string()));
        }
        Ok(rows.remove(0))
    }

    async fn delete_invite(&self, access_token: &str, id: &str) -> Result<(), AppError> {
        let url = self.rest_url(INVITES_TABLE, &[("id", format!("eq.{}", id))]);

        let response = self.user_request(Method::DELETE, &url, access_token).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
