use crate::constants::{routes, APP_NAME};
use crate::utils::escape_html;
use crate::views::{Flash, FlashKind};

const STYLES: &str = r#"
body{margin:0;font-family:system-ui,-apple-system,sans-serif;background:#f9fafb;color:#111827}
.shell{display:flex;min-height:100vh}
.sidebar{width:220px;background:#111827;color:#f9fafb;padding:24px 16px}
.sidebar a{display:block;color:#d1d5db;text-decoration:none;padding:8px 12px;border-radius:8px;margin-bottom:4px}
.sidebar a.active{background:#2563eb;color:#fff}
.content{flex:1}
header.top{background:#fff;border-bottom:1px solid #e5e7eb;padding:24px 32px;display:flex;justify-content:space-between;align-items:center}
header.top h1{margin:0;font-size:28px}
header.top p{margin:4px 0 0;color:#4b5563}
main{padding:32px}
.btn{padding:8px 16px;border:0;border-radius:8px;font-weight:500;cursor:pointer}
.btn-primary{background:#2563eb;color:#fff}
.btn-danger{background:none;color:#dc2626}
.btn-link{background:none;color:#7c3aed}
.flash{padding:16px;border-radius:8px;margin-bottom:24px}
.flash.success{background:#f0fdf4;color:#15803d;border:1px solid #bbf7d0}
.flash.error{background:#fef2f2;color:#b91c1c;border:1px solid #fecaca}
.banner{background:#eff6ff;color:#1d4ed8;border:1px solid #bfdbfe;padding:16px;border-radius:8px;margin-bottom:24px}
.card{background:#fff;border-radius:12px;box-shadow:0 1px 3px rgba(0,0,0,.08);overflow:hidden}
.grid{display:grid;gap:24px;grid-template-columns:repeat(auto-fill,minmax(280px,1fr))}
.empty{text-align:center;padding:64px 16px;color:#6b7280}
table{width:100%;border-collapse:collapse}
th{text-align:left;font-size:12px;text-transform:uppercase;color:#6b7280;background:#f9fafb;padding:12px 24px}
td{padding:16px 24px;border-top:1px solid #e5e7eb;font-size:14px;vertical-align:top}
.muted{color:#9ca3af;font-style:italic}
.thumb{width:48px;height:48px;border-radius:8px;object-fit:cover;border:1px solid #e5e7eb}
.more{display:inline-flex;width:48px;height:48px;border-radius:8px;background:#dbeafe;color:#1d4ed8;align-items:center;justify-content:center;font-size:12px;font-weight:600}
.pill{padding:4px 12px;border-radius:999px;font-size:12px;font-weight:500}
.pill.admin{background:#f3e8ff;color:#7e22ce}
.pill.contributor{background:#dbeafe;color:#1d4ed8}
.modal{position:fixed;inset:0;background:rgba(0,0,0,.75);display:flex;align-items:center;justify-content:center;padding:16px}
.modal img{max-width:90vw;max-height:90vh;border-radius:12px}
.modal a.close{position:absolute;top:24px;right:32px;color:#fff;font-size:32px;text-decoration:none}
input[type=text],input[type=email],input[type=password]{padding:8px 12px;border:1px solid #d1d5db;border-radius:8px}
"#;

/// Navigation context for authenticated pages
pub struct Nav<'a> {
    pub email: &'a str,
    pub active: &'static str,
}

const NAV_ITEMS: [(&str, &str); 3] = [
    (routes::DASHBOARD, "Dashboard"),
    (routes::INSIGHTS, "Insights"),
    (routes::TEAM, "Team"),
];

pub fn flash_html(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => {
            let class = match flash.kind {
                FlashKind::Success => "success",
                FlashKind::Error => "error",
            };
            format!(
                r#"<div class="flash {}" role="status">{}</div>"#,
                class,
                escape_html(&flash.text)
            )
        }
        None => String::new(),
    }
}

/// Page header with title, subtitle and the sign-out form
pub fn header(title: &str, subtitle: &str, email: &str) -> String {
    format!(
        r#"<header class="top"><div><h1>{}</h1><p>{}</p></div><div><span class="muted">{}</span>
<form method="post" action="{}" style="display:inline"><button class="btn btn-primary" type="submit">Sign Out</button></form></div></header>"#,
        escape_html(title),
        escape_html(subtitle),
        escape_html(email),
        routes::LOGOUT
    )
}

/// Full HTML document; `nav` adds the sidebar shown on authenticated pages
pub fn page(title: &str, nav: Option<Nav<'_>>, content: &str) -> String {
    let body = match nav {
        Some(nav) => {
            let links: String = NAV_ITEMS
                .iter()
                .map(|(href, label)| {
                    let class = if *href == nav.active { " class=\"active\"" } else { "" };
                    format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
                })
                .collect();
            format!(
                r#"<div class="shell"><nav class="sidebar"><h2>{}</h2>{}<p class="muted">{}</p></nav><div class="content">{}</div></div>"#,
                escape_html(APP_NAME),
                links,
                escape_html(nav.email),
                content
            )
        }
        None => content.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="View and manage your captured insights">
<title>{} | {}</title>
<style>{}</style>
</head>
<body>{}</body>
</html>"#,
        escape_html(title),
        escape_html(APP_NAME),
        STYLES,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_nav_is_marked() {
        let html = page(
            "Team",
            Some(Nav {
                email: "ada@example.com",
                active: routes::TEAM,
            }),
            "<p>x</p>",
        );
        assert!(html.contains(r#"<a href="/team" class="active">Team</a>"#));
        assert!(html.contains(r#"<a href="/insights">Insights</a>"#));
    }

    #[test]
    fn test_flash_is_escaped() {
        let html = flash_html(Some(&Flash::error("<b>bad</b>")));
        assert!(html.contains("flash error"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert_eq!(flash_html(None), "");
    }
}
