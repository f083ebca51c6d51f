use chrono::FixedOffset;

use crate::constants::{messages, routes};
use crate::models::{Invite, Role, SessionUser, TeamMember, TeamOverview};
use crate::utils::{escape_html, format_day};
use crate::views::layout::{flash_html, header, page, Nav};
use crate::views::Flash;

fn role_badge(role: Role) -> &'static str {
    match role {
        Role::Admin => r#"<span class="pill admin">👑 Admin</span>"#,
        Role::Contributor => r#"<span class="pill contributor">Contributor</span>"#,
    }
}

fn role_action(member: &TeamMember, user: &SessionUser) -> String {
    if member.id == user.id {
        return r#"<span class="muted">Your account</span>"#.to_string();
    }

    let target = member.role.toggled();
    let label = match target {
        Role::Admin => "↑ Upgrade to Admin",
        Role::Contributor => "↓ Downgrade to Contributor",
    };
    format!(
        r#"<form method="post" action="{}/role"><input type="hidden" name="user_id" value="{}"><input type="hidden" name="role" value="{}"><button class="btn btn-link" type="submit">{}</button></form>"#,
        routes::TEAM,
        escape_html(&member.id),
        target.as_str(),
        label
    )
}

fn member_row(member: &TeamMember, user: &SessionUser, is_admin: bool, offset: FixedOffset) -> String {
    let avatar_color = if member.role.is_admin() { "#9333ea" } else { "#2563eb" };
    let you = if member.id == user.id {
        r#"<br><small class="muted">You</small>"#
    } else {
        ""
    };
    let actions = if is_admin {
        format!(r#"<td style="text-align:right">{}</td>"#, role_action(member, user))
    } else {
        String::new()
    };

    format!(
        r#"<tr><td><span class="more" style="border-radius:999px;background:{};color:#fff">{}</span> {}{}</td><td>{}</td><td>{}</td>{}</tr>"#,
        avatar_color,
        escape_html(&member.initial()),
        escape_html(&member.email),
        you,
        role_badge(member.role),
        escape_html(&format_day(&member.created_at, offset)),
        actions
    )
}

fn invites_section(invites: &[Invite], offset: FixedOffset) -> String {
    let list = if invites.is_empty() {
        r#"<p class="muted">No pending invites</p>"#.to_string()
    } else {
        let rows: String = invites
            .iter()
            .map(|invite| {
                format!(
                    r#"<tr><td>{}</td><td>{}</td><td style="text-align:right"><form method="post" action="{}/invites/{}/revoke"><button class="btn btn-danger" type="submit">Revoke</button></form></td></tr>"#,
                    escape_html(&invite.email),
                    escape_html(&format_day(&invite.created_at, offset)),
                    routes::TEAM,
                    urlencoding::encode(&invite.id)
                )
            })
            .collect();
        format!(
            r#"<table><thead><tr><th>Email</th><th>Invited</th><th></th></tr></thead><tbody>{}</tbody></table>"#,
            rows
        )
    };

    format!(
        r#"<div class="card" style="margin-top:24px;padding:24px"><h2>Invite Team Member</h2>
<form method="post" action="{}/invite"><input type="email" name="email" placeholder="colleague@example.com" required> <button class="btn btn-primary" type="submit">Send Invite</button></form>
<h3>Pending Invites ({})</h3>{}</div>"#,
        routes::TEAM,
        invites.len(),
        list
    )
}

const PERMISSIONS: &str = r#"<div style="margin-top:24px;background:#f3f4f6;border-radius:8px;padding:16px"><h3>Role Permissions</h3>
<p><strong style="color:#9333ea">Admin:</strong> Can manage team members, change roles, and access all features</p>
<p><strong style="color:#2563eb">Contributor:</strong> Can create insights and view team members</p></div>"#;

pub fn team_page(
    user: &SessionUser,
    team: &TeamOverview,
    flash: Option<&Flash>,
    offset: FixedOffset,
) -> String {
    let is_admin = team.current_role.is_admin();

    let banner = if is_admin {
        String::new()
    } else {
        format!(r#"<div class="banner">{}</div>"#, messages::CONTRIBUTOR_BANNER)
    };

    let members = if team.members.is_empty() {
        format!(
            r#"<div class="empty"><h3>{}</h3><p>Team members will appear here</p></div>"#,
            messages::NO_MEMBERS
        )
    } else {
        let rows: String = team
            .members
            .iter()
            .map(|m| member_row(m, user, is_admin, offset))
            .collect();
        let actions_header = if is_admin {
            r#"<th style="text-align:right">Actions</th>"#
        } else {
            ""
        };
        format!(
            r#"<table><thead><tr><th>Member</th><th>Role</th><th>Joined</th>{}</tr></thead><tbody>{}</tbody></table>"#,
            actions_header, rows
        )
    };

    let invites = if is_admin {
        invites_section(&team.invites, offset)
    } else {
        String::new()
    };

    let content = format!(
        r#"{}<main style="max-width:1152px">{}{}<div class="card"><div style="padding:16px 24px"><h2>Team Members ({})</h2></div>{}</div>{}{}</main>"#,
        header("Team Management", "Manage team members and their roles", &user.email),
        banner,
        flash_html(flash),
        team.members.len(),
        members,
        invites,
        PERMISSIONS
    );

    page(
        "Team",
        Some(Nav {
            email: &user.email,
            active: routes::TEAM,
        }),
        &content,
    )
}
