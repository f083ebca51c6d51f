use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::Backend;

/// Shared by every worker through `web::Data`
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, config: AppConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 3000,
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "anon".to_string(),
        supabase_service_role_key: None,
        jwt_secret: crate::services::memory::TEST_SECRET.to_string(),
        cookie_secure: false,
        allowed_origins: vec![],
        display_offset: chrono::FixedOffset::east_opt(0).unwrap(),
        request_timeout: std::time::Duration::from_secs(5),
    }
}
