pub mod auth;
pub mod health;
pub mod insights;
pub mod metrics;
pub mod rest;
pub mod swagger;
pub mod team;

use actix_web::web;

use crate::constants::routes;
use crate::middleware::SessionGuard;

/// Registers every route. The catch-all page scope goes last so public
/// routes and the API scopes match first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Session
        .route(routes::HOME, web::get().to(auth::index))
        .route(routes::LOGIN, web::get().to(auth::login_form))
        .route(routes::LOGIN, web::post().to(auth::login))
        .route(routes::LOGOUT, web::post().to(auth::logout))

        // ==================== JSON API ====================

        .service(
            web::scope("/api/v1/insights")
                .wrap(SessionGuard)
                .service(rest::list_insights)
                .service(rest::create_insight)
                .service(rest::update_note)
                .service(rest::delete_insight),
        )
        .service(
            web::scope("/api/v1/team")
                .wrap(SessionGuard)
                .service(rest::get_team)
                .service(rest::change_role)
                .service(rest::create_invite),
        )

        // ==================== PAGES ====================

        .service(
            web::scope("")
                .wrap(SessionGuard)
                .route(routes::DASHBOARD, web::get().to(insights::dashboard))
                .route(routes::INSIGHTS, web::get().to(insights::list))
                .route("/insights/{id}/delete", web::post().to(insights::delete))
                .route("/insights/{id}/note", web::post().to(insights::annotate))
                .route(routes::TEAM, web::get().to(team::page))
                .route("/team/role", web::post().to(team::change_role))
                .route("/team/invite", web::post().to(team::invite))
                .route("/team/invites/{id}/revoke", web::post().to(team::revoke_invite)),
        );
}
