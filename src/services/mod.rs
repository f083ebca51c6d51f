pub mod auth_service;
pub mod backend;
pub mod insight_service;
pub mod supabase;
pub mod team_service;

#[cfg(test)]
pub mod memory;

pub use backend::Backend;
pub use supabase::SupabaseClient;
