// Auth domain handlers
pub mod user_handler;
