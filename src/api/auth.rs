use actix_web::{web, HttpRequest, HttpResponse};

use crate::constants::{messages, routes};
use crate::services::auth_service::{self, LoginForm, SessionCredentials};
use crate::state::AppState;
use crate::utils::AppError;
use crate::views::{self, login::login_page, Flash};

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header(("Location", location))
        .finish()
}

/// `/`: dashboard for a live session, login otherwise
pub async fn index(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let credentials = SessionCredentials::from_request(&req);

    let has_session = credentials
        .access_token
        .as_deref()
        .map(|token| auth_service::verify_access_token(token, &state.config.jwt_secret).is_ok())
        .unwrap_or(false)
        // The guard renews the session on the dashboard
        || credentials.refresh_token.is_some();

    if has_session {
        redirect(routes::DASHBOARD)
    } else {
        redirect(routes::LOGIN)
    }
}

pub async fn login_form() -> HttpResponse {
    views::html(login_page("", None))
}

pub async fn login(state: web::Data<AppState>, form: web::Form<LoginForm>) -> HttpResponse {
    let form = form.into_inner();
    log::info!("🔐 POST /login - email: {}", form.email.trim());

    match auth_service::login(state.backend(), &form).await {
        Ok(session) => {
            log::info!("✅ Login successful: {}", form.email.trim());
            let mut response = HttpResponse::SeeOther();
            response.insert_header(("Location", routes::DASHBOARD));
            for cookie in auth_service::session_cookies(&session, state.config.cookie_secure) {
                response.cookie(cookie);
            }
            response.finish()
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", form.email.trim(), e);
            let message = match e {
                AppError::InvalidRequest(msg) => msg,
                AppError::Remote(_) => messages::LOGIN_FAILED.to_string(),
                AppError::Transport(_) => messages::NETWORK.to_string(),
                other => other.public_message(),
            };
            let mut response = views::html(login_page(form.email.trim(), Some(&Flash::error(message))));
            *response.status_mut() = actix_web::http::StatusCode::UNAUTHORIZED;
            response
        }
    }
}

pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let credentials = SessionCredentials::from_request(&req);
    auth_service::logout(state.backend(), credentials.access_token.as_deref()).await;
    log::info!("👋 Signed out");

    let mut response = HttpResponse::SeeOther();
    response.insert_header(("Location", routes::LOGIN));
    for cookie in auth_service::cleared_cookies(state.config.cookie_secure) {
        response.cookie(cookie);
    }
    response.finish()
}
