//! Dataset loading and validation.
//!
//! Parses both artifacts in parallel, then checks that they describe the
//! same set of items before anything downstream gets to see them.

use crate::error::Result;
use crate::parser;
use crate::types::Dataset;
use std::path::Path;
use tracing::info;

/// Default catalog artifact name inside a data directory
pub const CATALOG_FILE: &str = "movie_list.dat";

/// Default similarity artifact name inside a data directory
pub const SIMILARITY_FILE: &str = "similarity.json";

impl Dataset {
    /// Load `movie_list.dat` and `similarity.json` from a directory
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        Self::load(
            &data_dir.join(CATALOG_FILE),
            &data_dir.join(SIMILARITY_FILE),
        )
    }

    /// Load the dataset from explicit artifact paths.
    ///
    /// Steps:
    /// 1. Parse the catalog and the matrix in parallel
    /// 2. Check the matrix is N x N for a catalog of N items
    pub fn load(catalog_path: &Path, similarity_path: &Path) -> Result<Self> {
        info!(
            catalog = %catalog_path.display(),
            similarity = %similarity_path.display(),
            "Loading dataset"
        );

        // The matrix is by far the larger file, so parse both at once
        let (catalog, similarity) = rayon::join(
            || parser::parse_catalog(catalog_path),
            || parser::parse_similarity(similarity_path),
        );
        let catalog = catalog?;
        let similarity = similarity?;

        info!(
            items = catalog.len(),
            matrix_size = similarity.size(),
            "Parsed artifacts"
        );

        let dataset = Dataset::new(catalog, similarity)?;
        info!("Dataset successfully loaded and validated");
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataLoadError;
    use std::fs;

    fn write_artifacts(dir: &Path, catalog: &str, matrix: &str) {
        fs::write(dir.join(CATALOG_FILE), catalog).unwrap();
        fs::write(dir.join(SIMILARITY_FILE), matrix).unwrap();
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            "movie_id::title\n10::A\n20::B\n30::C\n",
            "[[1.0, 0.5, 0.2], [0.5, 1.0, 0.3], [0.2, 0.3, 1.0]]",
        );

        let dataset = Dataset::load_from_files(dir.path()).unwrap();
        assert_eq!(dataset.catalog().len(), 3);
        assert_eq!(dataset.similarity().size(), 3);
        assert_eq!(dataset.similarity().get(1, 2), Some(0.3));
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            "movie_id::title\n10::A\n20::B\n30::C\n",
            "[[1.0, 0.5], [0.5, 1.0]]",
        );

        let err = Dataset::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DimensionMismatch { expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_ragged_matrix_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            "movie_id::title\n10::A\n20::B\n",
            "[[1.0, 0.5], [0.5]]",
        );

        let err = Dataset::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn test_malformed_matrix_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "movie_id::title\n10::A\n", "{\"rows\": 1}");

        let err = Dataset::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::MalformedMatrix(_)));
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CATALOG_FILE), "movie_id::title\n10::A\n").unwrap();

        let err = Dataset::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "movie_id::title\n", "[]");

        let err = Dataset::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ValidationError(_)));
    }
}
