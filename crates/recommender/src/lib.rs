//! # Recommender Crate
//!
//! Content-based "more like this" recommendations from a precomputed
//! similarity matrix.
//!
//! ## Components
//!
//! ### Ranking
//! `top_similar` ranks one matrix row: the query item is excluded by index,
//! scores are ordered high to low, and equal scores go to the lower index so
//! results are reproducible.
//!
//! ### Recommender
//! Resolves a title through the catalog, ranks, and maps the winning rows
//! back to catalog items.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::Recommender;
//! use data_loader::Dataset;
//! use std::sync::Arc;
//!
//! let dataset = Arc::new(Dataset::load_from_files(Path::new("data"))?);
//! let recommender = Recommender::new(dataset);
//!
//! for rec in recommender.similar_to_title("Avatar", 5)? {
//!     println!("{} ({:.3})", rec.item.title, rec.score);
//! }
//! ```

// Public modules
pub mod ranking;
pub mod recommender;

// Re-export commonly used types
pub use ranking::{top_similar, ScoredItem};
pub use recommender::{Recommendation, Recommender};
