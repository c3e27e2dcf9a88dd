// API key domain handlers
pub mod api_key_handler;
