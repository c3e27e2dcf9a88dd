// API key domain services
pub mod api_key_service;
pub mod key_material;
pub mod state;

pub use api_key_service::*;
pub use state::*;
