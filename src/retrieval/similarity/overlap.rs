use crate::normalize::Normalizer;
use crate::retrieval::case::{Case, Query};

use super::SimilarityStrategy;

/// Which overlap formula to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Substring membership with fault counting over raw ingredient phrases:
    /// a point per query phrase found in the joined case text, a fault per
    /// case phrase none of whose words occur in the query set, scored as
    /// `points / (query_len + faults)`.
    Membership,
    /// Jaccard index over normalized token sets.
    #[default]
    Jaccard,
}

/// Token-overlap similarity between ingredient sets.
pub struct OverlapSimilarity {
    policy: OverlapPolicy,
    normalizer: Normalizer,
}

impl OverlapSimilarity {
    pub fn new(policy: OverlapPolicy) -> Self {
        OverlapSimilarity {
            policy,
            normalizer: Normalizer::new(),
        }
    }

    pub fn jaccard() -> Self {
        Self::new(OverlapPolicy::Jaccard)
    }

    pub fn membership() -> Self {
        Self::new(OverlapPolicy::Membership)
    }

    fn score_membership(&self, case: &Case, query: &Query) -> f64 {
        if query.terms.is_empty() || case.ingredients.is_empty() {
            return 0.0;
        }
        let joined = case.ingredients.join(" ");
        let points = query
            .terms
            .iter()
            .filter(|term| joined.contains(term.as_str()))
            .count();
        // a case phrase with no word in the query set suggests a missing
        // ingredient the recipe still needs
        let faults = case
            .ingredients
            .iter()
            .filter(|phrase| !phrase.split_whitespace().any(|word| query.terms.contains(word)))
            .count();
        points as f64 / (query.terms.len() + faults) as f64
    }

    fn score_jaccard(&self, case: &Case, query: &Query) -> f64 {
        // case tokens are normalized on construction; normalization is
        // idempotent, so only the query side needs the pass here
        let query_tokens = self.normalizer.normalize_phrases(&query.terms);
        if case.tokens.is_empty() || query_tokens.is_empty() {
            return 0.0;
        }
        let union = case.tokens.union(&query_tokens).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = case.tokens.intersection(&query_tokens).count();
        intersection as f64 / union as f64
    }
}

impl SimilarityStrategy for OverlapSimilarity {
    fn score(&self, case: &Case, query: &Query) -> f64 {
        match self.policy {
            OverlapPolicy::Membership => self.score_membership(case, query),
            OverlapPolicy::Jaccard => self.score_jaccard(case, query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn case_with_tokens(id: u64, tokens: &[&str]) -> Case {
        Case::new(
            id,
            tokens.iter().map(|t| t.to_string()).collect(),
            tokens.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn case_with_phrases(id: u64, phrases: &[&str]) -> Case {
        Case::new(
            id,
            phrases.iter().map(|p| p.to_string()).collect(),
            BTreeSet::new(),
        )
    }

    #[test]
    fn jaccard_matches_hand_computed_values() {
        let strategy = OverlapSimilarity::jaccard();
        let r1 = case_with_tokens(1, &["tomato", "salt"]);
        let r2 = case_with_tokens(2, &["tomato", "onion", "garlic"]);
        let query = Query::new(["tomato", "onion"]);

        // r1: |{tomato}| / |{tomato, salt, onion}| = 1/3
        assert!((strategy.score(&r1, &query) - 1.0 / 3.0).abs() < 1e-12);
        // r2: |{tomato, onion}| / |{tomato, onion, garlic}| = 2/3
        assert!((strategy.score(&r2, &query) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn jaccard_is_symmetric() {
        let strategy = OverlapSimilarity::jaccard();
        let a = case_with_tokens(1, &["tomato", "salt", "basil"]);
        let b = case_with_tokens(2, &["tomato", "onion"]);
        let query_a = Query::from_case(&a);
        let query_b = Query::from_case(&b);
        assert_eq!(strategy.score(&a, &query_b), strategy.score(&b, &query_a));
    }

    #[test]
    fn jaccard_bounds_hold() {
        let strategy = OverlapSimilarity::jaccard();
        let a = case_with_tokens(1, &["tomato", "salt"]);
        // identical sets score 1
        assert_eq!(strategy.score(&a, &Query::from_case(&a)), 1.0);
        // disjoint sets score 0
        assert_eq!(strategy.score(&a, &Query::new(["onion", "garlic"])), 0.0);
        // empty query scores 0
        assert_eq!(strategy.score(&a, &Query::default()), 0.0);
        // empty case scores 0
        let empty = case_with_tokens(2, &[]);
        assert_eq!(strategy.score(&empty, &Query::new(["tomato"])), 0.0);
    }

    #[test]
    fn membership_matches_hand_computed_values() {
        let strategy = OverlapSimilarity::membership();
        let case = case_with_phrases(1, &["sliced bread", "butter"]);
        let query = Query::new(["bread", "milk"]);
        // points: "bread" is a substring of the joined text, "milk" is not.
        // faults: "butter" has no word in the query set.
        // 1 / (2 + 1)
        assert!((strategy.score(&case, &query) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn membership_empty_sides_score_zero() {
        let strategy = OverlapSimilarity::membership();
        let case = case_with_phrases(1, &["sliced bread"]);
        assert_eq!(strategy.score(&case, &Query::default()), 0.0);
        let empty = case_with_phrases(2, &[]);
        assert_eq!(strategy.score(&empty, &Query::new(["bread"])), 0.0);
    }

    #[test]
    fn membership_full_cover_scores_one() {
        let strategy = OverlapSimilarity::membership();
        let case = case_with_phrases(1, &["bread", "milk"]);
        let query = Query::new(["bread", "milk"]);
        assert_eq!(strategy.score(&case, &query), 1.0);
    }
}
