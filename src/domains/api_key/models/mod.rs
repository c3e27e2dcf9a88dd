// API key domain models
pub mod api_key;

pub use api_key::*;
