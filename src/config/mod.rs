//! Configuration module for page scraping
//!
//! This module provides the `ScrapeConfig` struct, its type-safe builder and
//! the raw `ActorInput` it can be built from.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithStartUrls};
pub use types::{ActorInput, ScrapeConfig, StartUrlEntry, search_run_id_from};
