pub mod calculations;
pub mod models;

pub use calculations::{TaxEngine, compute};
pub use models::*;
