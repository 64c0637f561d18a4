pub mod api;
pub mod models;

/// Identity used when a request carries no `user_id`.
pub const GUEST_USER_ID: &str = "guest";
