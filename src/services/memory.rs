// In-memory stand-in for the hosted platform, used by handler and service tests

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{
    AuthUser, Insight, Invite, InviteStatus, NewInsight, NewInvite, Role, Session, UserRole,
};
use crate::services::auth_service::Claims;
use crate::services::backend::Backend;
use crate::utils::AppError;

pub const TEST_SECRET: &str = "test-jwt-secret";

pub fn mint_token(user_id: &str, email: &str, ttl_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(email.to_string()),
        exp: exp.max(0) as usize,
        role: Some("authenticated".to_string()),
        aud: Some("authenticated".to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_ref()))
        .expect("test token encodes")
}

#[derive(Default)]
struct State {
    users: HashMap<String, (String, String)>,
    refresh_tokens: HashMap<String, String>,
    insights: Vec<Insight>,
    roles: Vec<UserRole>,
    invites: Vec<Invite>,
    next_id: u64,
    mutations: usize,
    signed_out: Vec<String>,
    invite_emails: Vec<String>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    pub admin_api_available: bool,
    pub fail_deletes: bool,
    pub fail_role_updates: bool,
    pub fail_invite_inserts: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            admin_api_available: true,
            ..Default::default()
        }
    }

    pub fn add_user(&self, id: &str, email: &str, password: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .users
            .insert(id.to_string(), (email.to_string(), password.to_string()));
    }

    pub fn add_role(&self, user_id: &str, role: Role, created_at: &str) {
        let mut state = self.state.lock().unwrap();
        state.roles.push(UserRole {
            user_id: user_id.to_string(),
            role,
            created_at: created_at.to_string(),
            updated_at: None,
        });
    }

    pub fn add_insight(&self, insight: Insight) {
        self.state.lock().unwrap().insights.push(insight);
    }

    pub fn add_invite(&self, id: &str, email: &str, invited_by: &str) {
        self.state.lock().unwrap().invites.push(Invite {
            id: id.to_string(),
            email: email.to_string(),
            invited_by: invited_by.to_string(),
            status: InviteStatus::Pending,
            created_at: "2024-03-01T00:00:00Z".to_string(),
        });
    }

    pub fn set_invite_status(&self, id: &str, status: InviteStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(invite) = state.invites.iter_mut().find(|i| i.id == id) {
            invite.status = status;
        }
    }

    pub fn issue_refresh_token(&self, user_id: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let token = format!("refresh-{}", state.next_id);
        state.refresh_tokens.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn insight_ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.insights.iter().map(|i| i.id.clone()).collect()
    }

    pub fn insight(&self, id: &str) -> Option<Insight> {
        let state = self.state.lock().unwrap();
        state.insights.iter().find(|i| i.id == id).cloned()
    }

    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        let state = self.state.lock().unwrap();
        state.roles.iter().find(|r| r.user_id == user_id).map(|r| r.role)
    }

    pub fn invites(&self) -> Vec<Invite> {
        self.state.lock().unwrap().invites.clone()
    }

    pub fn invite_emails(&self) -> Vec<String> {
        self.state.lock().unwrap().invite_emails.clone()
    }

    /// Number of successful writes (insert/update/delete)
    pub fn mutations(&self) -> usize {
        self.state.lock().unwrap().mutations
    }

    pub fn signed_out(&self) -> Vec<String> {
        self.state.lock().unwrap().signed_out.clone()
    }

    fn new_session(state: &mut State, user_id: &str) -> Session {
        let email = state
            .users
            .get(user_id)
            .map(|(email, _)| email.clone())
            .unwrap_or_default();
        state.next_id += 1;
        let refresh = format!("refresh-{}", state.next_id);
        state.refresh_tokens.insert(refresh.clone(), user_id.to_string());

        Session {
            access_token: mint_token(user_id, &email, 3600),
            refresh_token: refresh,
            user: AuthUser {
                id: user_id.to_string(),
                email: Some(email),
            },
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let mut state = self.state.lock().unwrap();
        let user_id = state
            .users
            .iter()
            .find(|(_, (e, p))| e == email && p == password)
            .map(|(id, _)| id.clone())
            .ok_or_else(|| AppError::Remote("Invalid login credentials (HTTP 400)".to_string()))?;
        Ok(Self::new_session(&mut state, &user_id))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AppError> {
        let mut state = self.state.lock().unwrap();
        let user_id = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::Remote("Invalid Refresh Token (HTTP 400)".to_string()))?;
        Ok(Self::new_session(&mut state, &user_id))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        self.state.lock().unwrap().signed_out.push(access_token.to_string());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, AppError> {
        if !self.admin_api_available {
            return Err(AppError::Config("SUPABASE_SERVICE_ROLE_KEY is not configured".to_string()));
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .map(|(id, (email, _))| AuthUser {
                id: id.clone(),
                email: Some(email.clone()),
            })
            .collect())
    }

    async fn invite_user_by_email(&self, email: &str) -> Result<(), AppError> {
        if !self.admin_api_available {
            return Err(AppError::Config("SUPABASE_SERVICE_ROLE_KEY is not configured".to_string()));
        }
        self.state.lock().unwrap().invite_emails.push(email.to_string());
        Ok(())
    }

    async fn list_insights(&self, _access_token: &str, owner_id: &str) -> Result<Vec<Insight>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Insight> = state
            .insights
            .iter()
            .filter(|i| i.user_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_insight(
        &self,
        _access_token: &str,
        owner_id: &str,
        insight: &NewInsight,
    ) -> Result<Insight, AppError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let row = Insight {
            id: format!("ins-{}", state.next_id),
            user_id: owner_id.to_string(),
            page_title: insight.page_title.clone(),
            page_url: None,
            url: insight.url.clone(),
            text: insight.text.clone(),
            note: insight.note.clone(),
            screenshot_url: None,
            screenshots: insight.screenshots.clone(),
            creator_email: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        state.insights.push(row.clone());
        state.mutations += 1;
        Ok(row)
    }

    async fn update_insight_note(
        &self,
        _access_token: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.insights.iter_mut().find(|i| i.id == id) {
            row.note = note.map(str::to_string);
        }
        state.mutations += 1;
        Ok(())
    }

    async fn delete_insight(&self, _access_token: &str, id: &str) -> Result<(), AppError> {
        if self.fail_deletes {
            return Err(AppError::Remote("permission denied for table insights (HTTP 403)".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.insights.retain(|i| i.id != id);
        state.mutations += 1;
        Ok(())
    }

    async fn list_user_roles(&self, _access_token: &str) -> Result<Vec<UserRole>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows = state.roles.clone();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn update_user_role(&self, _access_token: &str, user_id: &str, role: Role) -> Result<(), AppError> {
        if self.fail_role_updates {
            return Err(AppError::Transport("connection reset".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.roles.iter_mut().find(|r| r.user_id == user_id) {
            row.role = role;
            row.updated_at = Some(chrono::Utc::now().to_rfc3339());
        }
        state.mutations += 1;
        Ok(())
    }

    async fn list_invites(&self, _access_token: &str) -> Result<Vec<Invite>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows = state.invites.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_invite(&self, _access_token: &str, invite: &NewInvite) -> Result<Invite, AppError> {
        if self.fail_invite_inserts {
            return Err(AppError::Remote("duplicate key value (HTTP 409)".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let row = Invite {
            id: invite.id.clone(),
            email: invite.email.clone(),
            invited_by: invite.invited_by.clone(),
            status: invite.status,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        state.invites.push(row.clone());
        state.mutations += 1;
        Ok(row)
    }

    async fn delete_invite(&self, _access_token: &str, id: &str) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.invites.retain(|i| i.id != id);
        state.mutations += 1;
        Ok(())
    }
}
