// Shared utilities
pub mod id_generator;
pub mod amount;

pub use id_generator::*;
pub use amount::*;
