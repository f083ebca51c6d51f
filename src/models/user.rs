use serde::{Deserialize, Serialize};

/// User as returned by the platform's auth API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued by the auth API (password or refresh-token grant)
#[derive(Debug, Deserialize, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

/// Authenticated user attached to the request by the session guard
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    /// Forwarded to the platform so row-level policies apply to this user
    pub access_token: String,
}
