use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::artifacts::Artifact;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Directory the artifacts are cached in
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Catalog artifact file name inside `data_dir`
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// Similarity artifact file name inside `data_dir`
    #[serde(default = "default_similarity_file")]
    pub similarity_file: String,

    /// Where to download the catalog from when it is not cached
    #[serde(default)]
    pub catalog_url: Option<String>,

    /// Where to download the similarity matrix from when it is not cached
    #[serde(default)]
    pub similarity_url: Option<String>,

    /// OMDb API key; without one posters are placeholders
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Per-request timeout for metadata lookups, in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    /// Per-request timeout for artifact downloads, in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Number of recommendations shown when none is requested explicitly
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_catalog_file() -> String {
    data_loader::CATALOG_FILE.to_string()
}

fn default_similarity_file() -> String {
    data_loader::SIMILARITY_FILE.to_string()
}

fn default_omdb_api_url() -> String {
    metadata_client::DEFAULT_OMDB_URL.to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_download_timeout_secs() -> u64 {
    120
}

fn default_recommendation_count() -> usize {
    5
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<AppConfig>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    pub fn similarity_path(&self) -> PathBuf {
        self.data_dir.join(&self.similarity_file)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// The two artifacts the dataset is built from, catalog first
    pub fn artifacts(&self) -> [Artifact; 2] {
        [
            Artifact::new(&self.catalog_file, self.catalog_url.clone()),
            Artifact::new(&self.similarity_file, self.similarity_url.clone()),
        ]
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_file: default_catalog_file(),
            similarity_file: default_similarity_file(),
            catalog_url: None,
            similarity_url: None,
            omdb_api_key: None,
            omdb_api_url: default_omdb_api_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            recommendation_count: default_recommendation_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = from_pairs(&[]);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.catalog_path(), PathBuf::from("data/movie_list.dat"));
        assert_eq!(config.similarity_path(), PathBuf::from("data/similarity.json"));
        assert_eq!(config.omdb_api_key, None);
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.recommendation_count, 5);
    }

    #[test]
    fn test_environment_overrides() {
        let config = from_pairs(&[
            ("DATA_DIR", "/var/cache/reel-recs"),
            ("OMDB_API_KEY", "abc123"),
            ("LOOKUP_TIMEOUT_SECS", "3"),
            ("SIMILARITY_URL", "https://example.com/similarity.json"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/var/cache/reel-recs"));
        assert_eq!(config.omdb_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.lookup_timeout(), Duration::from_secs(3));

        let [catalog, similarity] = config.artifacts();
        assert_eq!(catalog.url, None);
        assert_eq!(
            similarity.url.as_deref(),
            Some("https://example.com/similarity.json")
        );
    }

    #[test]
    fn test_default_matches_empty_environment() {
        let default = AppConfig::default();
        let from_env = from_pairs(&[]);
        assert_eq!(default.data_dir, from_env.data_dir);
        assert_eq!(default.omdb_api_url, from_env.omdb_api_url);
        assert_eq!(default.download_timeout_secs, from_env.download_timeout_secs);
    }

    #[test]
    fn test_default_omdb_url() {
        let config = from_pairs(&[]);
        assert_eq!(config.omdb_api_url, "http://www.omdbapi.com");
    }
}
