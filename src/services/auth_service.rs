use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::{ACCESS_TOKEN_COOKIE, PASSWORD_MIN_LENGTH, REFRESH_TOKEN_COOKIE};
use crate::models::{Session, SessionUser};
use crate::services::backend::Backend;
use crate::utils::{is_valid_email, AppError};

/// Audience the platform stamps on user access tokens
const TOKEN_AUDIENCE: &str = "authenticated";

// Platform JWT claims (only the fields the dashboard reads)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
}

/// Tokens presented by the browser (cookies) or the extension (bearer header)
#[derive(Debug, Default, Clone)]
pub struct SessionCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionCredentials {
    pub fn from_request(req: &HttpRequest) -> Self {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let access_token = bearer.or_else(|| {
            req.cookie(ACCESS_TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        });

        let refresh_token = req
            .cookie(REFRESH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        Self {
            access_token,
            refresh_token,
        }
    }
}

/// Outcome of checking a request's credentials
#[derive(Debug)]
pub enum SessionState {
    Active(SessionUser),
    /// The access token had expired and was renewed; the new cookies must be sent back
    Refreshed(SessionUser, Session),
    Anonymous,
}

// Verify a platform access token (HS256, shared JWT secret)
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[TOKEN_AUDIENCE]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

fn session_user(claims: Claims, access_token: String) -> SessionUser {
    SessionUser {
        id: claims.sub,
        email: claims.email.unwrap_or_default(),
        access_token,
    }
}

/// Resolves the current session, renewing it once through the platform
/// when only the refresh token is still usable.
pub async fn resolve_session(
    backend: &dyn Backend,
    secret: &str,
    credentials: SessionCredentials,
) -> SessionState {
    if let Some(token) = credentials.access_token {
        match verify_access_token(&token, secret) {
            Ok(claims) => return SessionState::Active(session_user(claims, token)),
            Err(e) => log::debug!("Access token rejected: {}", e),
        }
    }

    let Some(refresh_token) = credentials.refresh_token else {
        return SessionState::Anonymous;
    };

    match backend.refresh_session(&refresh_token).await {
        Ok(session) => match verify_access_token(&session.access_token, secret) {
            Ok(claims) => {
                log::info!("🔄 Session refreshed for user {}", session.user.id);
                let user = session_user(claims, session.access_token.clone());
                SessionState::Refreshed(user, session)
            }
            Err(e) => {
                log::warn!("⚠️ Refreshed token failed verification: {}", e);
                SessionState::Anonymous
            }
        },
        Err(e) => {
            log::warn!("⚠️ Session refresh failed: {}", e);
            SessionState::Anonymous
        }
    }
}

// ==================== LOGIN / LOGOUT ====================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Checks the login form before calling the platform
pub fn validate_login(form: &LoginForm) -> Result<(), AppError> {
    if !is_valid_email(form.email.trim()) {
        return Err(AppError::InvalidRequest(
            crate::constants::messages::INVALID_EMAIL.to_string(),
        ));
    }
    if form.password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(AppError::InvalidRequest(
            crate::constants::messages::PASSWORD_TOO_SHORT.to_string(),
        ));
    }
    Ok(())
}

pub async fn login(backend: &dyn Backend, form: &LoginForm) -> Result<Session, AppError> {
    validate_login(form)?;
    backend
        .sign_in_with_password(form.email.trim(), &form.password)
        .await
}

/// Best effort: the local cookies are cleared whatever the platform answers
pub async fn logout(backend: &dyn Backend, access_token: Option<&str>) {
    if let Some(token) = access_token {
        if let Err(e) = backend.sign_out(token).await {
            log::error!("❌ Error signing out: {}", e);
        }
    }
}

// ==================== COOKIES ====================

pub fn session_cookies(session: &Session, secure: bool) -> [Cookie<'static>; 2] {
    // Access cookie lives as long as the refresh cookie; the guard renews expired tokens
    [
        build_cookie(ACCESS_TOKEN_COOKIE, session.access_token.clone(), secure, CookieDuration::days(30)),
        build_cookie(REFRESH_TOKEN_COOKIE, session.refresh_token.clone(), secure, CookieDuration::days(30)),
    ]
}

pub fn cleared_cookies(secure: bool) -> [Cookie<'static>; 2] {
    [
        build_cookie(ACCESS_TOKEN_COOKIE, String::new(), secure, CookieDuration::ZERO),
        build_cookie(REFRESH_TOKEN_COOKIE, String::new(), secure, CookieDuration::ZERO),
    ]
}

fn build_cookie(name: &'static str, value: String, secure: bool, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::{mint_token, MemoryBackend, TEST_SECRET};

    #[test]
    fn test_verify_access_token() {
        let token = mint_token("user-1", "ada@example.com", 3600);
        let claims = verify_access_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));

        assert!(verify_access_token(&token, "other-secret").is_err());
        assert!(verify_access_token("not-a-jwt", TEST_SECRET).is_err());

        let expired = mint_token("user-1", "ada@example.com", -3600);
        assert!(verify_access_token(&expired, TEST_SECRET).is_err());
    }

    #[tokio::test]
    async fn test_resolve_active_session() {
        let backend = MemoryBackend::new();
        let credentials = SessionCredentials {
            access_token: Some(mint_token("user-1", "ada@example.com", 3600)),
            refresh_token: None,
        };

        match resolve_session(&backend, TEST_SECRET, credentials).await {
            SessionState::Active(user) => {
                assert_eq!(user.id, "user-1");
                assert_eq!(user.email, "ada@example.com");
            }
            other => panic!("expected active session, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_refreshes_expired_session() {
        let backend = MemoryBackend::new();
        backend.add_user("user-1", "ada@example.com", "password1");
        let refresh = backend.issue_refresh_token("user-1");

        let credentials = SessionCredentials {
            access_token: Some(mint_token("user-1", "ada@example.com", -3600)),
            refresh_token: Some(refresh),
        };

        match resolve_session(&backend, TEST_SECRET, credentials).await {
            SessionState::Refreshed(user, session) => {
                assert_eq!(user.id, "user-1");
                assert_eq!(user.access_token, session.access_token);
            }
            other => panic!("expected refreshed session, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_anonymous() {
        let backend = MemoryBackend::new();
        let state = resolve_session(&backend, TEST_SECRET, SessionCredentials::default()).await;
        assert!(matches!(state, SessionState::Anonymous));

        let credentials = SessionCredentials {
            access_token: None,
            refresh_token: Some("unknown".to_string()),
        };
        let state = resolve_session(&backend, TEST_SECRET, credentials).await;
        assert!(matches!(state, SessionState::Anonymous));
    }

    #[test]
    fn test_validate_login() {
        let ok = LoginForm {
            email: "ada@example.com".into(),
            password: "secret1".into(),
        };
        assert!(validate_login(&ok).is_ok());

        let bad_email = LoginForm {
            email: "invalid-email".into(),
            password: "secret1".into(),
        };
        assert!(matches!(validate_login(&bad_email), Err(AppError::InvalidRequest(_))));

        let short = LoginForm {
            email: "ada@example.com".into(),
            password: "12345".into(),
        };
        assert!(matches!(validate_login(&short), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_cleared_cookies_expire_immediately() {
        for cookie in cleared_cookies(true) {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
            assert_eq!(cookie.secure(), Some(true));
            assert_eq!(cookie.http_only(), Some(true));
        }
    }
}
