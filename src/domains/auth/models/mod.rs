// Auth domain models
pub mod user;
pub mod jwt;
pub mod permission;
pub mod principal;

pub use user::*;
pub use jwt::*;
pub use permission::*;
pub use principal::*;
