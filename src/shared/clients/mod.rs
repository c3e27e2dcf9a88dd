// External API clients
pub mod paystack;

pub use paystack::*;
