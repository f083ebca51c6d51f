use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::constants::{messages, routes};
use crate::models::{remove_insight, Insight, SessionUser};
use crate::services::insight_service;
use crate::state::AppState;
use crate::utils::is_safe_link;
use crate::views::{self, dashboard::dashboard_page, insights::insights_page, Flash};

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub preview: Option<String>,
    /// Kept as text so a mangled index drops the modal instead of failing the page
    pub shot: Option<String>,
}

impl PreviewQuery {
    /// Index of the requested screenshot, `None` when it is not a valid index
    fn shot_index(&self) -> Option<usize> {
        match self.shot.as_deref() {
            None => Some(0),
            Some(raw) => raw.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub note: Option<String>,
}

/// Page a delete form posts back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Dashboard,
    Insights,
}

impl Origin {
    fn from_form(back: Option<&str>) -> Self {
        match back {
            Some("insights") => Origin::Insights,
            _ => Origin::Dashboard,
        }
    }
}

async fn load_or_flash(state: &AppState, user: &SessionUser) -> (Vec<Insight>, Option<Flash>) {
    match insight_service::load_insights(state.backend(), user).await {
        Ok(insights) => (insights, None),
        Err(e) => {
            log::error!("❌ Error loading insights for {}: {}", user.id, e);
            (Vec::new(), Some(Flash::error(messages::LOAD_FAILED)))
        }
    }
}

fn render(
    state: &AppState,
    user: &SessionUser,
    origin: Origin,
    insights: &[Insight],
    preview: Option<&str>,
    flash: Option<&Flash>,
) -> HttpResponse {
    let offset = state.config.display_offset;
    let html = match origin {
        Origin::Dashboard => {
            let stats = insight_service::stats(insights, chrono::Utc::now());
            dashboard_page(user, insights, &stats, flash, offset)
        }
        Origin::Insights => insights_page(user, insights, preview, flash, offset),
    };
    views::html(html)
}

/// Screenshot `shot` of insight `id`, if it exists and may be displayed
fn preview_source<'a>(insights: &'a [Insight], id: &str, shot: usize) -> Option<&'a str> {
    insights
        .iter()
        .find(|i| i.id == id)?
        .screenshot_list()
        .into_iter()
        .filter(|s| is_safe_link(s))
        .nth(shot)
}

pub async fn dashboard(state: web::Data<AppState>, user: web::ReqData<SessionUser>) -> HttpResponse {
    let user = user.into_inner();
    let (insights, flash) = load_or_flash(&state, &user).await;
    render(&state, &user, Origin::Dashboard, &insights, None, flash.as_ref())
}

pub async fn list(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse {
    let user = user.into_inner();
    let (insights, flash) = load_or_flash(&state, &user).await;

    let preview = query
        .preview
        .as_deref()
        .zip(query.shot_index())
        .and_then(|(id, shot)| preview_source(&insights, id, shot));

    render(&state, &user, Origin::Insights, &insights, preview, flash.as_ref())
}

pub async fn delete(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    path: web::Path<String>,
    form: web::Form<DeleteForm>,
) -> HttpResponse {
    let user = user.into_inner();
    let id = path.into_inner();
    let origin = Origin::from_form(form.back.as_deref());

    let (insights, load_error) = load_or_flash(&state, &user).await;

    let (insights, flash) = match insight_service::delete_insight(state.backend(), &user, &id).await {
        Ok(()) => (
            remove_insight(insights, &id),
            load_error.unwrap_or_else(|| Flash::success(messages::DELETED)),
        ),
        Err(e) => {
            log::error!("❌ Error deleting insight {}: {}", id, e);
            (insights, Flash::error(messages::DELETE_FAILED))
        }
    };

    render(&state, &user, origin, &insights, None, Some(&flash))
}

pub async fn annotate(
    state: web::Data<AppState>,
    user: web::ReqData<SessionUser>,
    path: web::Path<String>,
    form: web::Form<NoteForm>,
) -> HttpResponse {
    let user = user.into_inner();
    let id = path.into_inner();

    match insight_service::annotate_insight(state.backend(), &user, &id, form.note.as_deref()).await {
        Ok(_) => HttpResponse::SeeOther()
            .insert_header(("Location", routes::INSIGHTS))
            .finish(),
        Err(e) => {
            log::error!("❌ Error updating note on insight {}: {}", id, e);
            let (insights, _) = load_or_flash(&state, &user).await;
            render(
                &state,
                &user,
                Origin::Insights,
                &insights,
                None,
                Some(&Flash::error(messages::GENERIC)),
            )
        }
    }
}
