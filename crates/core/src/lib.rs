//! Sales QA Core Library
//!
//! Foundational pieces shared by the other crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The immutable `Dataset`

pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ProviderType};
pub use dataset::Dataset;
pub use error::{AppError, AppResult};
