//! Prompt system for the Sales QA service.
//!
//! This crate provides:
//! - YAML-based prompt definitions (a built-in default plus file overrides)
//! - Handlebars rendering of the scoped Q&A prompt

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{default_prompt, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
