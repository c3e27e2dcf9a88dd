// Business domains
pub mod auth;
pub mod api_key;
pub mod wallet;
