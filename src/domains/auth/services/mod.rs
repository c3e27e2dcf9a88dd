// Auth domain services
pub mod access_gate;
pub mod jwt_service;
pub mod user_service;
pub mod state;

pub use access_gate::*;
pub use jwt_service::*;
pub use user_service::*;
pub use state::*;
