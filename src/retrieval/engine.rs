use rayon::prelude::*;
use serde::Serialize;

use crate::retrieval::case::{Case, CaseBase, CaseId, Query};
use crate::retrieval::similarity::SimilarityStrategy;

/// Default number of matches returned to callers.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// A single retrieval result entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitEntry {
    pub id: CaseId,
    pub score: f64,
}

/// Ordered retrieval results, descending by score.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitEntry> {
        self.list.iter()
    }

    /// Mean score over the returned matches, 0 if there are none.
    pub fn mean_score(&self) -> f64 {
        if self.list.is_empty() {
            return 0.0;
        }
        self.list.iter().map(|entry| entry.score).sum::<f64>() / self.list.len() as f64
    }

    /// Sort descending by score. `Vec::sort_by` is stable, so ties keep
    /// their existing (collection) order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|entry| !entry.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }
}

/// Score every case in the collection against the query, order descending
/// and truncate.
///
/// Guarantees: output length is `min(limit, |collection|)`; scores lie in
/// `[0, 1]`; ties are broken by collection iteration order; an empty
/// collection or a zero limit yields an empty result, never an error.
pub fn retrieve<S>(casebase: &CaseBase, query: &Query, strategy: &S, limit: usize) -> Hits
where
    S: SimilarityStrategy + ?Sized,
{
    if limit == 0 || casebase.is_empty() {
        return Hits::default();
    }
    let cases: Vec<&Case> = casebase.iter().collect();
    let list: Vec<HitEntry> = cases
        .par_iter()
        .map(|case| HitEntry {
            id: case.id,
            score: strategy.score(case, query),
        })
        .collect();
    let mut hits = Hits { list };
    hits.sort_by_score();
    hits.list.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::similarity::{OverlapSimilarity, TfIdfSimilarity};

    fn case(id: CaseId, tokens: &[&str]) -> Case {
        Case::new(
            id,
            tokens.iter().map(|t| t.to_string()).collect(),
            tokens.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn two_recipes() -> CaseBase {
        [case(1, &["tomato", "salt"]), case(2, &["tomato", "onion", "garlic"])]
            .into_iter()
            .collect()
    }

    #[test]
    fn ranks_by_jaccard_with_exact_scores() {
        let casebase = two_recipes();
        let strategy = OverlapSimilarity::jaccard();
        let hits = retrieve(&casebase, &Query::new(["tomato", "onion"]), &strategy, 2);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits.list[0].id, 2);
        assert!((hits.list[0].score - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(hits.list[1].id, 1);
        assert!((hits.list[1].score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_query_keeps_stable_collection_order() {
        let casebase: CaseBase =
            [case(7, &["a"]), case(3, &["b"]), case(5, &["c"])].into_iter().collect();
        let strategy = OverlapSimilarity::jaccard();
        let hits = retrieve(&casebase, &Query::default(), &strategy, 2);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits.list[0].id, 7);
        assert_eq!(hits.list[1].id, 3);
        assert!(hits.iter().all(|entry| entry.score == 0.0));
    }

    #[test]
    fn output_length_is_min_of_limit_and_collection() {
        let casebase = two_recipes();
        let strategy = OverlapSimilarity::jaccard();
        let query = Query::new(["tomato"]);
        assert_eq!(retrieve(&casebase, &query, &strategy, 0).len(), 0);
        assert_eq!(retrieve(&casebase, &query, &strategy, 1).len(), 1);
        assert_eq!(retrieve(&casebase, &query, &strategy, 10).len(), 2);
    }

    #[test]
    fn empty_collection_yields_empty_result() {
        let casebase = CaseBase::new();
        let strategy = OverlapSimilarity::jaccard();
        assert!(retrieve(&casebase, &Query::new(["tomato"]), &strategy, 5).is_empty());
    }

    #[test]
    fn smaller_limit_is_a_prefix_of_larger_limit() {
        let casebase: CaseBase = [
            case(1, &["tomato", "salt"]),
            case(2, &["tomato", "onion"]),
            case(3, &["onion", "garlic"]),
            case(4, &["flour"]),
        ]
        .into_iter()
        .collect();
        let strategy = OverlapSimilarity::jaccard();
        let query = Query::new(["tomato", "onion", "garlic"]);

        let full = retrieve(&casebase, &query, &strategy, casebase.len());
        for limit in 0..=casebase.len() {
            let hits = retrieve(&casebase, &query, &strategy, limit);
            assert_eq!(hits.list, full.list[..limit]);
        }
    }

    #[test]
    fn works_through_a_trait_object() {
        let casebase = two_recipes();
        let model = TfIdfSimilarity::fit(&casebase);
        let strategy: &dyn SimilarityStrategy = &model;
        let hits = retrieve(&casebase, &Query::new(["tomato", "onion"]), strategy, 2);
        assert_eq!(hits.list[0].id, 2);
    }
}
