use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::constants::routes;
use crate::services::auth_service::{self, SessionCredentials, SessionState};
use crate::state::AppState;
use crate::utils::AppError;

/// Session guard for pages and the JSON API.
///
/// Anonymous page requests are redirected to the login page, anonymous API
/// requests get `401`. Authenticated requests carry a `SessionUser` in their
/// extensions, read by handlers through `web::ReqData<SessionUser>`.
pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::error!("❌ AppState missing; session guard cannot run");
                return Err(actix_web::error::ErrorInternalServerError("Server misconfigured"));
            };

            let credentials = SessionCredentials::from_request(req.request());
            let resolved =
                auth_service::resolve_session(state.backend(), &state.config.jwt_secret, credentials).await;

            match resolved {
                SessionState::Active(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                SessionState::Refreshed(user, session) => {
                    req.extensions_mut().insert(user);
                    let mut res = service.call(req).await?;
                    for cookie in auth_service::session_cookies(&session, state.config.cookie_secure) {
                        if let Err(e) = res.response_mut().add_cookie(&cookie) {
                            log::warn!("⚠️ Failed to set refreshed session cookie: {}", e);
                        }
                    }
                    Ok(res.map_into_left_body())
                }
                SessionState::Anonymous => {
                    let response = reject(req.request(), state.config.cookie_secure);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

fn reject(req: &HttpRequest, secure: bool) -> HttpResponse {
    if req.path().starts_with("/api/") {
        return AppError::Unauthorized.error_response();
    }

    let mut builder = HttpResponse::Found();
    builder.insert_header(("Location", routes::LOGIN));
    // Drop whatever stale tokens the browser still holds
    if req.cookie(crate::constants::ACCESS_TOKEN_COOKIE).is_some()
        || req.cookie(crate::constants::REFRESH_TOKEN_COOKIE).is_some()
    {
        for cookie in auth_service::cleared_cookies(secure) {
            builder.cookie(cookie);
        }
    }
    builder.finish()
}
