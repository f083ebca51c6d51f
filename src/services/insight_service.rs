use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::DAYS_IN_WEEK;
use crate::models::{Insight, NewInsight, SessionUser};
use crate::services::backend::Backend;
use crate::utils::{recent_items_count, sanitize_text, AppError};

#[derive(Debug, Serialize, PartialEq, utoipa::ToSchema)]
pub struct InsightStats {
    pub total: usize,
    /// Captured within the last week
    pub this_week: usize,
}

pub fn stats(insights: &[Insight], now: DateTime<Utc>) -> InsightStats {
    InsightStats {
        total: insights.len(),
        this_week: recent_items_count(
            insights.iter().map(|i| i.created_at.as_str()),
            DAYS_IN_WEEK,
            now,
        ),
    }
}

pub async fn load_insights(backend: &dyn Backend, user: &SessionUser) -> Result<Vec<Insight>, AppError> {
    let insights = backend.list_insights(&user.access_token, &user.id).await?;
    log::info!("📋 Loaded {} insights for user {}", insights.len(), user.id);
    Ok(insights)
}

pub async fn create_insight(
    backend: &dyn Backend,
    user: &SessionUser,
    request: NewInsight,
) -> Result<Insight, AppError> {
    let insight = request.validated()?;
    let stored = backend
        .insert_insight(&user.access_token, &user.id, &insight)
        .await?;

    log::info!("✅ Insight {} captured for user {}", stored.id, user.id);
    Ok(stored)
}

pub async fn delete_insight(backend: &dyn Backend, user: &SessionUser, id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        return Err(AppError::InvalidRequest("Missing insight id".to_string()));
    }
    backend.delete_insight(&user.access_token, id).await?;

    log::info!("🗑️  Insight {} deleted by user {}", id, user.id);
    Ok(())
}

/// Stores the sanitised note; a blank note clears it. Returns what was stored.
pub async fn annotate_insight(
    backend: &dyn Backend,
    user: &SessionUser,
    id: &str,
    note: Option<&str>,
) -> Result<Option<String>, AppError> {
    let note = note.map(sanitize_text).filter(|n| !n.is_empty());
    backend
        .update_insight_note(&user.access_token, id, note.as_deref())
        .await?;

    log::info!("📝 Note updated on insight {} by user {}", id, user.id);
    Ok(note)
}
