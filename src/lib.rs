// CMS demo seeder - loads demo pages and a homepage into the content store

// Core types and primitives
pub mod core;

// Storage-facing collaborators: document manager, event repository, path cleanup
pub mod infrastructure;

// Documents and events
pub mod models;

// Fixtures and the content they generate
pub mod data_seeder;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
