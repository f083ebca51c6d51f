// Application constants shared by views and handlers

pub const APP_NAME: &str = "Insight Capture";
pub const APP_TAGLINE: &str = "AI-powered insights from your team";

pub mod routes {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const LOGOUT: &str = "/logout";
    pub const DASHBOARD: &str = "/dashboard";
    pub const INSIGHTS: &str = "/insights";
    pub const TEAM: &str = "/team";
}

pub mod messages {
    // Errors
    pub const GENERIC: &str = "An error occurred. Please try again.";
    pub const DELETE_FAILED: &str = "Failed to delete insight";
    pub const LOAD_FAILED: &str = "Failed to load data";
    pub const TEAM_LOAD_FAILED: &str = "Failed to load team members";
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const INVITE_FAILED: &str = "Failed to send invite. Please try again.";
    pub const INVITE_DUPLICATE: &str = "An invite for this email is already pending";
    pub const INVITE_ONLY_ADMINS: &str = "Only admins can invite team members";
    pub const REVOKE_FAILED: &str = "Failed to revoke invite";
    pub const INVITE_NOT_PENDING: &str = "This invite no longer exists or was already answered";
    pub const NETWORK: &str = "Network error. Please check your connection.";
    pub const ROLE_ONLY_ADMINS: &str = "Only admins can change roles";
    pub const ROLE_SELF: &str = "You cannot change your own role";
    pub const ROLE_FAILED: &str = "Failed to update role";
    pub const LOGIN_FAILED: &str = "Invalid email or password";
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

    // Success
    pub const DELETED: &str = "Successfully deleted";
    pub const INVITE_SENT: &str = "Invitation email sent!";
    pub const INVITE_SAVED: &str = "Invite saved! The user can now sign up with this email.";
    pub const INVITE_REVOKED: &str = "Invite revoked";

    // Info
    pub const NO_INSIGHTS: &str = "No insights yet";
    pub const NO_INSIGHTS_DESC: &str = "Start capturing insights using the Chrome extension";
    pub const NO_MEMBERS: &str = "No team members yet";
    pub const CONTRIBUTOR_BANNER: &str =
        "You are viewing team members as a contributor. Only admins can change roles.";
}

pub const DAYS_IN_WEEK: i64 = 7;

pub const SCREENSHOT_PREVIEW_LIMIT: usize = 3;

pub const PASSWORD_MIN_LENGTH: usize = 6;

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";
