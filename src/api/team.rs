use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::constants::messages;
use crate::models::{Role, SessionUser, TeamOverview};
use crate::services::team_service;
use crate::state::AppState;
use crate::utils::AppError;
use crate::views::{self, team::team_page, Flash};

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteForm {
    pub email: String,
}

/// Reloads the team and renders it; load errors replace `flash`
async fn render(state: &AppState, user: &SessionUser, flash: Option<Flash>) -> HttpResponse {
    let (team, flash) = match team_service::load_team(state.backend(), user).await {
        Ok(team) => (team, flash),
        Err(e) => {
            log::error!("❌ Error loading team members: {}", e);
            let empty = TeamOverview {
                members: Vec::new(),
                current_role: Role::default(),
                invites: Vec::new(),
            };
            (empty, Some(Flash::error(messages::TEAM_LOAD_FAILED)))
        }
    };

    views::html(team_page(user, &team, flash.as_ref(), state.config.display_offset))
}

/// Message for a rejected team action; platform details stay in the log
fn rejection(error: AppError, fallback: &str) -> Flash {
    match error {
        AppError::Forbidden(msg) | AppError::InvalidRequest(msg) | AppError::NotFound(msg) => Flash::error(msg),
        other => {
            log::error!("❌ Team action failed: {}", other);
            Flash::error(fallback)
        }
    }
}

pub async fn page(state: web::Data<AppState>, user: web::ReqData<SessionUser>) -> HttpResponse {
    render(&state, &user, None).await
}

pub async fn change_role(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    form: web::Form<RoleForm>,
) -> HttpResponse {
    let user = user.into_inner();

    let flash = match form.role.parse::<Role>() {
        Ok(role) => match team_service::change_role(state.backend(), &user, &form.user_id, role).await {
            Ok(role) => Flash::success(format!("Role updated to {}", role)),
            Err(e) => rejection(e, messages::ROLE_FAILED),
        },
        Err(e) => {
            log::warn!("⚠️ Rejected role change: {}", e);
            Flash::error(messages::ROLE_FAILED)
        }
    };

    render(&state, &user, Some(flash)).await
}

pub async fn invite(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    form: web::Form<InviteForm>,
) -> HttpResponse {
    let user = user.into_inner();

    let flash = match team_service::invite_member(state.backend(), &user, &form.email).await {
        Ok((_, outcome)) => Flash::success(outcome.message()),
        Err(e) => rejection(e, messages::INVITE_FAILED),
    };

    render(&state, &user, Some(flash)).await
}

pub async fn revoke_invite(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    path: web::Path<String>,
) -> HttpResponse {
    let user = user.into_inner();
    let invite_id = path.into_inner();

    let flash = match team_service::revoke_invite(state.backend(), &user, &invite_id).await {
        Ok(()) => Flash::success(messages::INVITE_REVOKED),
        Err(e) => rejection(e, messages::REVOKE_FAILED),
    };

    render(&state, &user, Some(flash)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::{mint_token, MemoryBackend};
    use crate::state::test_config;
    use actix_web::cookie::Cookie;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn seeded() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.add_user("admin-1", "ada@example.com", "secret123");
        backend.add_user("user-2", "grace@example.com", "secret123");
        backend.add_role("admin-1", Role::Admin, "2024-01-01T00:00:00Z");
        backend.add_role("user-2", Role::Contributor, "2024-01-02T00:00:00Z");
        backend
    }

    fn session(user_id: &str, email: &str) -> Cookie<'static> {
        Cookie::new("sb-access-token", mint_token(user_id, email, 3600))
    }

    macro_rules! app {
        ($backend:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::new($backend, test_config())))
                    .configure(crate::api::configure),
            )
            .await
        };
    }

    macro_rules! post_form {
        ($app:expr, $uri:expr, $cookie:expr, $form:expr $(,)?) => {{
            let req = test::TestRequest::post()
                .uri($uri)
                .cookie($cookie)
                .set_form($form)
                .to_request();
            String::from_utf8(test::call_and_read_body(&$app, req).await.to_vec()).unwrap()
        }};
    }

    #[actix_web::test]
    async fn test_team_page_merges_emails() {
        let app = app!(Arc::new(seeded()));

        let req = test::TestRequest::get()
            .uri("/team")
            .cookie(session("admin-1", "ada@example.com"))
            .to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert!(body.contains("Team Members (2)"));
        assert!(body.contains("grace@example.com"));
        assert!(body.contains("↑ Upgrade to Admin"));
    }

    #[actix_web::test]
    async fn test_contributor_role_change_is_rejected() {
        let backend = Arc::new(seeded());
        let app = app!(backend.clone());

        let body = post_form!(
            app,
            "/team/role",
            session("user-2", "grace@example.com"),
            &[("user_id", "admin-1"), ("role", "contributor")],
        );

        assert!(body.contains(messages::ROLE_ONLY_ADMINS));
        assert_eq!(backend.role_of("admin-1"), Some(Role::Admin));
        assert_eq!(backend.mutations(), 0);
    }

    #[actix_web::test]
    async fn test_admin_changes_role() {
        let backend = Arc::new(seeded());
        let app = app!(backend.clone());

        let body = post_form!(
            app,
            "/team/role",
            session("admin-1", "ada@example.com"),
            &[("user_id", "user-2"), ("role", "admin")],
        );

        assert!(body.contains("Role updated to admin"));
        assert_eq!(backend.role_of("user-2"), Some(Role::Admin));
        assert!(body.contains("↓ Downgrade to Contributor"));
    }

    #[actix_web::test]
    async fn test_admin_cannot_change_own_role() {
        let backend = Arc::new(seeded());
        let app = app!(backend.clone());

        let body = post_form!(
            app,
            "/team/role",
            session("admin-1", "ada@example.com"),
            &[("user_id", "admin-1"), ("role", "contributor")],
        );

        assert!(body.contains(messages::ROLE_SELF));
        assert_eq!(backend.role_of("admin-1"), Some(Role::Admin));
    }

    #[actix_web::test]
    async fn test_role_update_failure_message() {
        let mut backend = seeded();
        backend.fail_role_updates = true;
        let app = app!(Arc::new(backend));

        let body = post_form!(
            app,
            "/team/role",
            session("admin-1", "ada@example.com"),
            &[("user_id", "user-2"), ("role", "admin")],
        );

        assert!(body.contains(messages::ROLE_FAILED));
    }

    #[actix_web::test]
    async fn test_invite_flows() {
        let backend = Arc::new(seeded());
        let app = app!(backend.clone());
        let admin = || session("admin-1", "ada@example.com");

        let body = post_form!(app, "/team/invite", admin(), &[("email", "invalid-email")]);
        assert!(body.contains(messages::INVALID_EMAIL));
        assert!(backend.invites().is_empty());

        let body = post_form!(app, "/team/invite", admin(), &[("email", "new@example.com")]);
        assert!(body.contains(messages::INVITE_SENT));
        assert!(body.contains("new@example.com"));
        assert_eq!(backend.invite_emails(), vec!["new@example.com"]);

        let body = post_form!(app, "/team/invite", admin(), &[("email", "NEW@example.com")]);
        assert!(body.contains(messages::INVITE_DUPLICATE));
        assert_eq!(backend.invites().len(), 1);
    }

    #[actix_web::test]
    async fn test_invite_saved_without_admin_api() {
        let mut backend = seeded();
        backend.admin_api_available = false;
        let backend = Arc::new(backend);
        let app = app!(backend.clone());

        let body = post_form!(
            app,
            "/team/invite",
            session("admin-1", "ada@example.com"),
            &[("email", "new@example.com")],
        );

        assert!(body.contains(messages::INVITE_SAVED));
        assert_eq!(backend.invites().len(), 1);
    }

    #[actix_web::test]
    async fn test_invite_insert_failure() {
        let mut backend = seeded();
        backend.fail_invite_inserts = true;
        let app = app!(Arc::new(backend));

        let body = post_form!(
            app,
            "/team/invite",
            session("admin-1", "ada@example.com"),
            &[("email", "new@example.com")],
        );

        assert!(body.contains(messages::INVITE_FAILED));
    }

    #[actix_web::test]
    async fn test_revoke_invite() {
        let backend = Arc::new(seeded());
        backend.add_invite("inv-1", "new@example.com", "admin-1");
        let app = app!(backend.clone());

        let body = post_form!(
            app,
            "/team/invites/inv-1/revoke",
            session("admin-1", "ada@example.com"),
            &[("confirm", "1")],
        );

        assert!(body.contains(messages::INVITE_REVOKED));
        assert!(backend.invites().is_empty());
    }

    #[actix_web::test]
    async fn test_revoke_unknown_invite_is_rejected() {
        let backend = Arc::new(seeded());
        backend.add_invite("inv-1", "new@example.com", "admin-1");
        let app = app!(backend.clone());

        let body = post_form!(
            app,
            "/team/invites/inv-404/revoke",
            session("admin-1", "ada@example.com"),
            &[("confirm", "1")],
        );

        assert!(body.contains(messages::INVITE_NOT_PENDING));
        assert!(!body.contains(messages::INVITE_REVOKED));
        assert_eq!(backend.invites().len(), 1);
    }
}
