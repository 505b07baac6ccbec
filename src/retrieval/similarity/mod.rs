pub mod overlap;
pub mod tfidf;

pub use overlap::{OverlapPolicy, OverlapSimilarity};
pub use tfidf::TfIdfSimilarity;

use crate::retrieval::case::{Case, Query};

/// Pluggable similarity scoring between one case and one query.
///
/// Implementations return a value in `[0.0, 1.0]`; `0.0` means "no usable
/// signal" (empty query, empty case, unknown case) and is never an error.
pub trait SimilarityStrategy: Send + Sync {
    fn score(&self, case: &Case, query: &Query) -> f64;
}
