//! # Data Loader Crate
//!
//! This crate loads the precomputed recommendation artifacts: the movie
//! catalog and the pairwise similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, Catalog, SimilarityMatrix, Dataset)
//! - **parser**: Parse the artifact files into Rust structs
//! - **index**: Load both artifacts and validate them against each other
//! - **error**: Error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data"))?;
//!
//! let index = dataset.catalog().resolve_index("Avatar")?;
//! let row = dataset.similarity().row(index).unwrap();
//! println!("{} has {} neighbours", dataset.catalog().item_at(index)?.title, row.len() - 1);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, LookupError, Result};
pub use index::{CATALOG_FILE, SIMILARITY_FILE};
pub use types::{
    // Type aliases
    MovieId,
    // Core types
    Item,
    Catalog,
    SimilarityMatrix,
    Dataset,
};
