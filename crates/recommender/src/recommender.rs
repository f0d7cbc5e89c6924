//! Title-level recommendations over a shared dataset.

use crate::ranking::top_similar;
use data_loader::{Dataset, Item, LookupError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A recommended catalog item with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub item: Item,
    pub score: f32,
}

/// Maps between titles and matrix rows around `top_similar`.
///
/// Cheap to clone; all clones share one read-only dataset.
#[derive(Debug, Clone)]
pub struct Recommender {
    dataset: Arc<Dataset>,
}

impl Recommender {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Top `limit` items most similar to the item at `index`
    pub fn similar_to_index(
        &self,
        index: usize,
        limit: usize,
    ) -> Result<Vec<Recommendation>, LookupError> {
        let catalog = self.dataset.catalog();

        top_similar(index, self.dataset.similarity(), limit)?
            .into_iter()
            .map(|scored| -> Result<Recommendation, LookupError> {
                Ok(Recommendation {
                    item: catalog.item_at(scored.index)?.clone(),
                    score: scored.score,
                })
            })
            .collect()
    }

    /// Top `limit` items most similar to the first item titled `title`
    #[instrument(skip(self))]
    pub fn similar_to_title(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, LookupError> {
        let index = self.dataset.catalog().resolve_index(title)?;
        debug!(index, "Resolved title");
        self.similar_to_index(index, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Catalog, SimilarityMatrix};

    fn build_recommender() -> Recommender {
        let catalog = Catalog::from_items(vec![
            (100, "A".to_string()),
            (200, "B".to_string()),
            (300, "C".to_string()),
            (400, "D".to_string()),
        ]);
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.9, 0.1],
            vec![0.9, 1.0, 0.4, 0.2],
            vec![0.9, 0.4, 1.0, 0.3],
            vec![0.1, 0.2, 0.3, 1.0],
        ])
        .unwrap();
        Recommender::new(Arc::new(Dataset::new(catalog, matrix).unwrap()))
    }

    #[test]
    fn test_similar_to_title_maps_back_to_items() {
        let recommender = build_recommender();
        let recs = recommender.similar_to_title("A", 2).unwrap();

        let titles: Vec<&str> = recs.iter().map(|r| r.item.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
        assert_eq!(recs[0].item.id, 200);
        assert_eq!(recs[1].score, 0.9);
    }

    #[test]
    fn test_unknown_title() {
        let recommender = build_recommender();
        let err = recommender.similar_to_title("Z", 2).unwrap_err();
        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[test]
    fn test_similar_to_index_out_of_range() {
        let recommender = build_recommender();
        let err = recommender.similar_to_index(9, 2).unwrap_err();
        assert_eq!(err, LookupError::IndexOutOfRange { index: 9, len: 4 });
    }
}
