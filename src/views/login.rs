use crate::constants::{routes, APP_NAME, APP_TAGLINE, PASSWORD_MIN_LENGTH};
use crate::utils::escape_html;
use crate::views::layout::{flash_html, page};
use crate::views::Flash;

/// Login form; `email` is echoed back after a failed attempt
pub fn login_page(email: &str, flash: Option<&Flash>) -> String {
    let content = format!(
        r#"<main style="max-width:400px;margin:80px auto">
<div class="card" style="padding:32px">
<h1>{}</h1>
<p class="muted">{}</p>
{}
<form method="post" action="{}">
<p><label>Email<br><input type="email" name="email" value="{}" required autocomplete="email"></label></p>
<p><label>Password<br><input type="password" name="password" minlength="{}" required autocomplete="current-password"></label></p>
<button class="btn btn-primary" type="submit">Sign In</button>
</form>
</div>
</main>"#,
        escape_html(APP_NAME),
        escape_html(APP_TAGLINE),
        flash_html(flash),
        routes::LOGIN,
        escape_html(email),
        PASSWORD_MIN_LENGTH
    );

    page("Sign In", None, &content)
}
