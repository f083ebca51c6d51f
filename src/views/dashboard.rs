use chrono::FixedOffset;

use crate::constants::{messages, routes};
use crate::models::{Insight, SessionUser};
use crate::services::insight_service::InsightStats;
use crate::utils::{escape_html, format_day, is_safe_link, truncate_text};
use crate::views::layout::{flash_html, header, page, Nav};
use crate::views::Flash;

const CARD_TEXT_LIMIT: usize = 240;

const CONFIRM_DELETE: &str = "return confirm('Are you sure you want to delete this insight?')";

/// Delete button posting back to the page it was rendered on
pub fn delete_form(insight_id: &str, back: &str) -> String {
    format!(
        r#"<form method="post" action="/insights/{}/delete" onsubmit="{}" style="display:inline"><input type="hidden" name="back" value="{}"><button class="btn btn-danger" type="submit">Delete</button></form>"#,
        urlencoding::encode(insight_id),
        CONFIRM_DELETE,
        escape_html(back)
    )
}

fn card(insight: &Insight, offset: FixedOffset) -> String {
    let mut html = String::from(r#"<div class="card">"#);

    if let Some(shot) = insight.screenshot_list().into_iter().find(|s| is_safe_link(s)) {
        html.push_str(&format!(
            r#"<img src="{}" alt="Screenshot" style="width:100%;height:192px;object-fit:cover">"#,
            escape_html(shot)
        ));
    }

    html.push_str(r#"<div style="padding:16px">"#);
    if let Some(title) = insight.title() {
        html.push_str(&format!("<h3>{}</h3>", escape_html(title)));
    }
    if let Some(body) = insight.body() {
        html.push_str(&format!("<p>{}</p>", escape_html(&truncate_text(body, CARD_TEXT_LIMIT))));
    }
    if let Some(link) = insight.link() {
        if is_safe_link(link) {
            html.push_str(&format!(
                r#"<a href="{0}" target="_blank" rel="noopener noreferrer">{0}</a>"#,
                escape_html(link)
            ));
        } else {
            html.push_str(&format!("<span>{}</span>", escape_html(link)));
        }
    }

    html.push_str(&format!(
        r#"<div style="display:flex;justify-content:space-between;margin-top:16px;padding-top:16px;border-top:1px solid #e5e7eb"><span class="muted">{}</span>{}</div>"#,
        escape_html(&format_day(&insight.created_at, offset)),
        delete_form(&insight.id, "dashboard")
    ));
    html.push_str("</div></div>");
    html
}

pub fn dashboard_page(
    user: &SessionUser,
    insights: &[Insight],
    stats: &InsightStats,
    flash: Option<&Flash>,
    offset: FixedOffset,
) -> String {
    let list = if insights.is_empty() {
        format!(
            r#"<div class="card empty"><h3>{}</h3><p>{}</p></div>"#,
            messages::NO_INSIGHTS,
            messages::NO_INSIGHTS_DESC
        )
    } else {
        let cards: String = insights.iter().map(|i| card(i, offset)).collect();
        format!(r#"<div class="grid">{}</div>"#, cards)
    };

    let content = format!(
        r#"{}<main>{}<div style="margin-bottom:24px"><h2>Your Insights ({})</h2><p class="muted">Insights captured from your Chrome extension &middot; {} in the last 7 days</p></div>{}</main>"#,
        header("Insight Capture Dashboard", "View and manage your captured insights", &user.email),
        flash_html(flash),
        stats.total,
        stats.this_week,
        list
    );

    page(
        "Dashboard",
        Some(Nav {
            email: &user.email,
            active: routes::DASHBOARD,
        }),
        &content,
    )
}
