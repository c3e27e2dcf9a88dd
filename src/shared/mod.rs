// Shared module
pub mod config;
pub mod middleware;
pub mod clients;
pub mod database;
pub mod errors;
pub mod services;
pub mod utils;

pub use clients::*;
pub use database::*;
pub use errors::*;
pub use services::*;
pub use utils::*;
