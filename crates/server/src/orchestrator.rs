//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Resolve the selected title in the catalog
//! 2. Rank every other movie by precomputed similarity
//! 3. Look up poster and detail link for each result, concurrently
//! 4. Return display-ready rows in ranking order
//!
//! Lookup failures stay local to their row: the row gets the placeholder
//! poster and `#` link, and the rest of the list is unaffected.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use data_loader::{Catalog, Dataset, LookupError, MovieId};
use metadata_client::{MetadataProvider, MovieDetails, OmdbClient, PlaceholderProvider};
use recommender::{Recommendation, Recommender};

use crate::config::AppConfig;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    /// 1-based position in the result list
    pub rank: usize,
    pub index: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
    pub detail_url: String,
}

/// Main orchestrator that ties ranking and metadata lookup together
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    recommender: Recommender,
    metadata: Arc<dyn MetadataProvider>,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator over a loaded dataset
    ///
    /// # Arguments
    /// * `dataset` - Shared read-only catalog and similarity matrix
    /// * `metadata` - Where posters and links come from
    pub fn new(dataset: Arc<Dataset>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            recommender: Recommender::new(dataset),
            metadata,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.recommender.dataset().catalog()
    }

    /// Main entry point: get recommendations for a selected title
    ///
    /// # Returns
    /// Up to `limit` rows sorted by similarity (highest first), or
    /// `LookupError::NotFound` if the title is not in the catalog.
    /// Metadata failures never surface here.
    pub async fn get_recommendations(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>, LookupError> {
        let start_time = Instant::now();

        let ranked = self.recommender.similar_to_title(title, limit)?;
        info!(
            title = %title,
            candidates = ranked.len(),
            "Ranked similar movies"
        );

        let titles: Vec<String> = ranked.iter().map(|r| r.item.title.clone()).collect();
        let details = self.fetch_details(titles).await;

        let recommendations = assemble(ranked, details);

        info!(
            title = %title,
            returned = recommendations.len(),
            elapsed = ?start_time.elapsed(),
            "Recommendations ready"
        );
        Ok(recommendations)
    }

    /// Look up display metadata for every title at once
    ///
    /// One task per title; a task that fails to complete yields the placeholder.
    async fn fetch_details(&self, titles: Vec<String>) -> Vec<MovieDetails> {
        let handles: Vec<_> = titles
            .into_iter()
            .map(|title| {
                let metadata = self.metadata.clone();
                tokio::spawn(async move { metadata.details_or_placeholder(&title).await })
            })
            .collect();

        let mut details = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(d) => details.push(d),
                Err(e) => {
                    warn!(error = %e, "Metadata task failed, using placeholder");
                    details.push(MovieDetails::placeholder());
                }
            }
        }
        details
    }
}

/// Zip ranked items with their metadata into numbered rows
fn assemble(ranked: Vec<Recommendation>, details: Vec<MovieDetails>) -> Vec<MovieRecommendation> {
    ranked
        .into_iter()
        .zip(details)
        .enumerate()
        .map(|(position, (rec, details))| MovieRecommendation {
            rank: position + 1,
            index: rec.item.index,
            movie_id: rec.item.id,
            title: rec.item.title,
            score: rec.score,
            poster_url: details.poster_url,
            detail_url: details.detail_url,
        })
        .collect()
}

/// Pick the metadata provider for this session.
///
/// Offline mode, or no API key configured, means placeholders only.
pub fn metadata_provider(config: &AppConfig, offline: bool) -> Result<Arc<dyn MetadataProvider>> {
    if offline {
        info!("Offline mode, posters disabled");
        return Ok(Arc::new(PlaceholderProvider));
    }

    match config.omdb_api_key.as_deref().filter(|key| !key.is_empty()) {
        Some(key) => {
            let client = OmdbClient::new(key, &config.omdb_api_url, config.lookup_timeout())?;
            info!(url = %client.base_url(), timeout = ?config.lookup_timeout(), "Using OMDb for posters");
            Ok(Arc::new(client))
        }
        None => {
            warn!("OMDB_API_KEY is not set, posters disabled");
            Ok(Arc::new(PlaceholderProvider))
        }
    }
}
