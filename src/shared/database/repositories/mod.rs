// All repositories module
pub mod auth;
pub mod wallet;
pub mod api_key;

// Re-export all repositories for convenience
pub use auth::*;
pub use wallet::*;
pub use api_key::*;
