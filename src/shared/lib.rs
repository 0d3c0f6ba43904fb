// Declare modules at the root level
pub mod domain;
pub mod error;
pub mod export;
pub mod insights;
pub mod store;
pub mod time;
pub mod validators;

// Test utilities module (generators for unit and integration tests)
pub mod test_utils;

// Re-export everything under a shared namespace for external access
pub mod shared {
    pub use super::domain;
    pub use super::error;
    pub use super::export;
    pub use super::insights;
    pub use super::store;
    pub use super::time;
    pub use super::validators;
}

// Also re-export at root for convenience
pub use domain::*;
pub use error::*;
pub use export::*;
pub use insights::*;
pub use store::*;
pub use time::*;
pub use validators::*;
