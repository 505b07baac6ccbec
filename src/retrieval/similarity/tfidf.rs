use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::normalize::Normalizer;
use crate::retrieval::case::{Case, CaseBase, CaseId, Query};

use super::SimilarityStrategy;

/// TF-IDF + cosine similarity over a fitted case collection.
///
/// The model is built once per distinct collection: vocabulary and smoothed
/// IDF weights over the whole corpus, plus one L2-normalized sparse weight
/// vector per case. Scoring a collection the model was not fitted on is a
/// correctness bug; the leave-one-out evaluator therefore re-fits inside
/// every worker.
pub struct TfIdfSimilarity {
    vocabulary: IndexMap<String, usize>,
    idf: Vec<f64>,
    case_vectors: HashMap<CaseId, Vec<(usize, f64)>>,
    normalizer: Normalizer,
}

impl TfIdfSimilarity {
    /// Fit vocabulary, IDF weights and per-case vectors over the collection.
    pub fn fit(casebase: &CaseBase) -> Self {
        let mut vocabulary: IndexMap<String, usize> = IndexMap::new();
        let mut doc_freq: Vec<u64> = Vec::new();
        for case in casebase.iter() {
            for token in &case.tokens {
                let next = vocabulary.len();
                let dim = *vocabulary.entry(token.clone()).or_insert(next);
                if dim == doc_freq.len() {
                    doc_freq.push(0);
                }
                // tokens are a set, so each counts once per document
                doc_freq[dim] += 1;
            }
        }

        // smoothed idf: ln((1 + n) / (1 + df)) + 1
        let doc_num = casebase.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + doc_num) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut case_vectors = HashMap::with_capacity(casebase.len());
        for case in casebase.iter() {
            case_vectors.insert(case.id, project(case.tokens.iter(), &vocabulary, &idf));
        }

        debug!(
            cases = casebase.len(),
            vocabulary = vocabulary.len(),
            "fitted tf-idf model"
        );
        TfIdfSimilarity {
            vocabulary,
            idf,
            case_vectors,
            normalizer: Normalizer::new(),
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

impl SimilarityStrategy for TfIdfSimilarity {
    /// Cosine similarity between the query projection and the stored case
    /// vector. Unknown case ids and queries with no in-vocabulary token
    /// score 0.
    fn score(&self, case: &Case, query: &Query) -> f64 {
        let Some(case_vector) = self.case_vectors.get(&case.id) else {
            return 0.0;
        };
        let query_tokens = self.normalizer.normalize_phrases(&query.terms);
        let query_vector = project(query_tokens.iter(), &self.vocabulary, &self.idf);
        if query_vector.is_empty() || case_vector.is_empty() {
            return 0.0;
        }
        // both sides are L2-normalized, so the dot product is the cosine
        dot_sparse(case_vector, &query_vector).clamp(0.0, 1.0)
    }
}

/// Project a token set into the fitted vocabulary space and L2-normalize.
/// Out-of-vocabulary tokens are ignored.
fn project<'a, I>(tokens: I, vocabulary: &IndexMap<String, usize>, idf: &[f64]) -> Vec<(usize, f64)>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut dims: Vec<usize> = tokens
        .into_iter()
        .filter_map(|token| vocabulary.get(token).copied())
        .collect();
    dims.sort_unstable();
    dims.dedup();

    let mut vector: Vec<(usize, f64)> = dims.into_iter().map(|dim| (dim, idf[dim])).collect();
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in &mut vector {
            *weight /= norm;
        }
    }
    vector
}

/// Dot product of two sparse vectors sorted by dimension.
fn dot_sparse(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    dot
}
