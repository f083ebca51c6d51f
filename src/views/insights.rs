use chrono::FixedOffset;

use crate::constants::{messages, routes, SCREENSHOT_PREVIEW_LIMIT};
use crate::models::{Insight, SessionUser};
use crate::utils::{escape_html, format_date, is_safe_link, safe_get_hostname, INVALID_URL};
use crate::views::dashboard::delete_form;
use crate::views::layout::{flash_html, header, page, Nav};
use crate::views::Flash;

fn screenshots_cell(insight: &Insight) -> String {
    let shots: Vec<&str> = insight
        .screenshot_list()
        .into_iter()
        .filter(|s| is_safe_link(s))
        .collect();

    if shots.is_empty() {
        return r#"<span class="more" style="background:#f3f4f6;color:#9ca3af">&ndash;</span>"#.to_string();
    }

    let mut html: String = shots
        .iter()
        .take(SCREENSHOT_PREVIEW_LIMIT)
        .enumerate()
        .map(|(idx, shot)| {
            format!(
                r#"<a href="{}?preview={}&amp;shot={}"><img class="thumb" src="{}" alt="Screenshot {}"></a> "#,
                routes::INSIGHTS,
                urlencoding::encode(&insight.id),
                idx,
                escape_html(shot),
                idx + 1
            )
        })
        .collect();

    if shots.len() > SCREENSHOT_PREVIEW_LIMIT {
        html.push_str(&format!(
            r#"<span class="more">+{}</span>"#,
            shots.len() - SCREENSHOT_PREVIEW_LIMIT
        ));
    }
    html
}

fn url_cell(insight: &Insight) -> String {
    match insight.link() {
        Some(link) => {
            let host = safe_get_hostname(link, INVALID_URL);
            if is_safe_link(link) {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                    escape_html(link),
                    escape_html(&host)
                )
            } else {
                escape_html(&host)
            }
        }
        None => r#"<span class="muted">No URL</span>"#.to_string(),
    }
}

fn note_form(insight: &Insight) -> String {
    format!(
        r#"<form method="post" action="/insights/{}/note" style="margin-top:8px"><input type="text" name="note" value="{}" placeholder="Add a note"> <button class="btn btn-link" type="submit">Save</button></form>"#,
        urlencoding::encode(&insight.id),
        escape_html(insight.note().unwrap_or_default())
    )
}

fn row(insight: &Insight, user: &SessionUser, offset: FixedOffset) -> String {
    let text = match insight.text.as_deref().filter(|t| !t.is_empty()) {
        Some(text) => format!("<p>{}</p>", escape_html(text)),
        None => r#"<span class="muted">No text</span>"#.to_string(),
    };
    let title = match insight.title() {
        Some(title) => format!("<strong>{}</strong>", escape_html(title)),
        None => r#"<span class="muted">No title</span>"#.to_string(),
    };
    let creator = insight
        .creator_email
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(&user.email);

    format!(
        r#"<tr><td>{}</td><td>{}{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td style="text-align:right">{}</td></tr>"#,
        screenshots_cell(insight),
        text,
        note_form(insight),
        title,
        url_cell(insight),
        escape_html(creator),
        escape_html(&format_date(&insight.created_at, offset)),
        delete_form(&insight.id, "insights")
    )
}

/// Full-size screenshot overlay; closing it navigates back to the table
fn modal(src: &str) -> String {
    format!(
        r#"<div class="modal" role="dialog"><a class="close" href="{}" aria-label="Close">&times;</a><img src="{}" alt="Full size screenshot"></div>"#,
        routes::INSIGHTS,
        escape_html(src)
    )
}

pub fn insights_page(
    user: &SessionUser,
    insights: &[Insight],
    preview: Option<&str>,
    flash: Option<&Flash>,
    offset: FixedOffset,
) -> String {
    let table = if insights.is_empty() {
        format!(
            r#"<div class="empty"><h3>{}</h3><p>{}</p></div>"#,
            messages::NO_INSIGHTS,
            messages::NO_INSIGHTS_DESC
        )
    } else {
        let rows: String = insights.iter().map(|i| row(i, user, offset)).collect();
        format!(
            r#"<table><thead><tr><th>Screenshots</th><th>Text</th><th>Page</th><th>URL</th><th>Creator</th><th>Created</th><th style="text-align:right">Actions</th></tr></thead><tbody>{}</tbody></table>"#,
            rows
        )
    };

    let modal = preview
        .filter(|src| is_safe_link(src))
        .map(modal)
        .unwrap_or_default();

    let content = format!(
        r#"{}<main>{}<div class="card">{}</div></main>{}"#,
        header("All Insights", "Complete overview of captured insights", &user.email),
        flash_html(flash),
        table,
        modal
    );

    page(
        "Insights",
        Some(Nav {
            email: &user.email,
            active: routes::INSIGHTS,
        }),
        &content,
    )
}
