//! Gifteez: gift recommendation scoring engine
//!
//! Ranks catalog gifts for a query (recipient, budget, occasion, interests).
//! Candidates pass hard filters and a soft relevance gate, get a semantic
//! profile, and are scored as a weighted blend of budget, occasion, persona and
//! trend fit with short Dutch explanations.
//!
//! The library is usable on its own; the `gifteez-engine` binary wraps it in a
//! small CLI over JSON catalogs.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod feedback;
pub mod filter;
pub mod models;
pub mod price;
pub mod profile;
pub mod scoring;
pub mod sort;

// Re-export main types for convenience
pub use catalog::{CatalogError, CatalogSource, FileCatalog, InMemoryCatalog};
pub use config::{ConfigError, EngineConfig};
pub use engine::GiftEngine;
pub use feedback::{FeedbackAdapter, FeedbackError, SharedFeedback};
pub use models::{FeedbackEntry, Gift, GiftQuery, HardFilters, ScoredGift, SubmitFeedbackParams};
pub use profile::{Dimension, SemanticProfile, SemanticProfiler};
pub use scoring::{GiftScore, GiftScorer, ScoringWeights};
pub use sort::SortBy;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
