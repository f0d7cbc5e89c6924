//! Core domain types for the recommendation dataset.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - `Item`: one movie, addressed by its row in the similarity matrix
//! - `Catalog`: the ordered list of items with a title lookup
//! - `SimilarityMatrix`: dense N x N precomputed scores
//! - `Dataset`: the validated pair, shared read-only for the whole session

use crate::error::{DataLoadError, LookupError, Result};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier of a movie in the source database (e.g. TMDB id)
pub type MovieId = u32;

// =============================================================================
// Catalog
// =============================================================================

/// One catalog entry.
///
/// `index` is the item's row and column in the similarity matrix and never
/// changes once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub index: usize,
    pub id: MovieId,
    /// Display title. Not unique across the catalog.
    pub title: String,
}

/// Ordered collection of recommendable items.
///
/// Insertion order is matrix row order, so `items[i].index == i` always holds.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) items: Vec<Item>,
    /// Title -> index of the first item carrying that title
    pub(crate) title_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from `(id, title)` pairs, assigning indices in order.
    pub fn from_items<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (MovieId, String)>,
    {
        let mut catalog = Self::default();
        for (id, title) in entries {
            catalog.push(id, title);
        }
        catalog
    }

    pub(crate) fn push(&mut self, id: MovieId, title: String) {
        let index = self.items.len();
        // Duplicate titles keep pointing at the first occurrence
        self.title_index.entry(title.clone()).or_insert(index);
        self.items.push(Item { index, id, title });
    }

    /// Resolve a title to the index of the first item with exactly that title.
    pub fn resolve_index(&self, title: &str) -> std::result::Result<usize, LookupError> {
        self.title_index
            .get(title)
            .copied()
            .ok_or_else(|| LookupError::NotFound {
                title: title.to_string(),
            })
    }

    /// Get the item at a given index.
    pub fn item_at(&self, index: usize) -> std::result::Result<&Item, LookupError> {
        self.items.get(index).ok_or(LookupError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// All titles in catalog order.
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.title.as_str())
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.title_index.contains_key(title)
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches;
    /// within each group items stay in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Item> {
        let query = query.to_lowercase();
        let mut matches: Vec<(u8, &Item)> = self
            .items
            .iter()
            .filter_map(|item| {
                let title = item.title.to_lowercase();
                if title == query {
                    Some((0, item))
                } else if title.contains(&query) {
                    Some((1, item))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by_key(|(relevance, item)| (*relevance, item.index));
        matches.into_iter().map(|(_, item)| item).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Square matrix of precomputed pairwise similarity scores.
///
/// Stored row-major in a single buffer; `row(i)` is a borrowed slice into it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from nested rows, rejecting anything that is not square.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(DataLoadError::RaggedRow {
                    row: row_idx,
                    expected: size,
                    found: row.len(),
                });
            }
            scores.extend(row);
        }

        Ok(Self { size, scores })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Scores of item `index` against every item, including itself.
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if col >= self.size {
            return None;
        }
        self.row(row).map(|r| r[col])
    }
}

// =============================================================================
// Dataset - The Session Context
// =============================================================================

/// Catalog and similarity matrix, validated against each other.
///
/// Built once at startup and handed around as `Arc<Dataset>`; nothing
/// mutates it afterwards.
#[derive(Debug)]
pub struct Dataset {
    pub(crate) catalog: Catalog,
    pub(crate) similarity: SimilarityMatrix,
}

impl Dataset {
    /// Pair a catalog with its matrix.
    ///
    /// Fails if the catalog is empty or the matrix is not N x N for a
    /// catalog of N items.
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> Result<Self> {
        if catalog.is_empty() {
            return Err(DataLoadError::ValidationError(
                "catalog contains no items".to_string(),
            ));
        }
        if similarity.size() != catalog.len() {
            return Err(DataLoadError::DimensionMismatch {
                expected: catalog.len(),
                found: similarity.size(),
            });
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}
