//! Top-K ranking over one row of the similarity matrix.
//!
//! ## Algorithm
//! 1. Take the query item's row
//! 2. Drop the query item itself (by index, wherever it would have ranked)
//! 3. Order by score descending, equal scores by ascending index
//! 4. Keep the first k
//!
//! Only the k winners are fully sorted: a partial selection moves them to
//! the front first. Because the ordering is total, the output is the same
//! as sorting the whole row.

use data_loader::{LookupError, SimilarityMatrix};
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// A candidate item and its similarity to the query item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub index: usize,
    pub score: f32,
}

/// Rank every other item by similarity to `query_index` and return the top `k`.
///
/// `k` larger than the number of other items returns all of them; `k == 0`
/// returns an empty vector. Fails only when `query_index` is not a row of
/// the matrix.
#[instrument(skip(matrix), fields(matrix_size = matrix.size()))]
pub fn top_similar(
    query_index: usize,
    matrix: &SimilarityMatrix,
    k: usize,
) -> Result<Vec<ScoredItem>, LookupError> {
    let row = matrix
        .row(query_index)
        .ok_or(LookupError::IndexOutOfRange {
            index: query_index,
            len: matrix.size(),
        })?;

    let mut candidates: Vec<ScoredItem> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(index, _)| index != query_index)
        .map(|(index, score)| ScoredItem { index, score })
        .collect();

    let k = k.min(candidates.len());
    if k == 0 {
        return Ok(Vec::new());
    }

    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, rank_order);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(rank_order);

    debug!(returned = candidates.len(), "Ranked similar items");
    Ok(candidates)
}

/// Ranking order: higher score first, NaN after every real score, then lower index.
fn rank_order(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    let by_score = match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b
            .score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    };
    by_score.then_with(|| a.index.cmp(&b.index))
}
