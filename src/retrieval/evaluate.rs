use std::panic::{catch_unwind, AssertUnwindSafe};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::retrieval::case::{CaseBase, CaseId, Query};
use crate::retrieval::engine::{retrieve, DEFAULT_RESULT_LIMIT};
use crate::retrieval::similarity::SimilarityStrategy;

/// How each holdout's retrieval result is folded into the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationPolicy {
    /// Mean similarity over the matches returned for each holdout.
    #[default]
    MeanSimilarity,
    /// Fraction of holdouts for which a case with an identical token set
    /// was retrieved.
    ExactMatch,
}

#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Number of holdout cases to draw; clamped to the collection size.
    pub sample_size: usize,
    /// Retrieval limit used for every holdout run.
    pub limit: usize,
    /// Seed for reproducible sampling; `None` samples from entropy.
    pub seed: Option<u64>,
    pub policy: AggregationPolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            sample_size: 100,
            limit: DEFAULT_RESULT_LIMIT,
            seed: None,
            policy: AggregationPolicy::default(),
        }
    }
}

/// Outcome of a leave-one-out evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Aggregate mean in [0, 1].
    pub mean_similarity: f64,
    /// Holdout cases actually evaluated.
    pub cases_tested: usize,
    /// Samples that panicked; they stay in the denominator with a zero
    /// contribution.
    pub failures: usize,
}

impl EvaluationReport {
    fn neutral() -> Self {
        EvaluationReport {
            mean_similarity: 0.0,
            cases_tested: 0,
            failures: 0,
        }
    }
}

/// Leave-one-out evaluation over a random sample of the collection.
///
/// For each sampled case: the case becomes the query, the collection minus
/// that case becomes the candidate pool, the strategy is rebuilt from
/// `strategy_for` against the reduced pool, and retrieval runs with the
/// configured limit. Samples are independent, so they run on a rayon worker
/// pool; the aggregate mean is order-independent.
///
/// An empty collection or a zero sample size yields the neutral report.
pub fn evaluate_leave_one_out<F, S>(
    casebase: &CaseBase,
    strategy_for: F,
    config: &EvaluationConfig,
) -> EvaluationReport
where
    F: Fn(&CaseBase) -> S + Sync,
    S: SimilarityStrategy,
{
    let sample_size = config.sample_size.min(casebase.len());
    if sample_size == 0 {
        return EvaluationReport::neutral();
    }

    let ids: Vec<CaseId> = casebase.ids().collect();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sampled: Vec<CaseId> = rand::seq::index::sample(&mut rng, ids.len(), sample_size)
        .into_iter()
        .map(|index| ids[index])
        .collect();

    info!(
        sample = sample_size,
        total = casebase.len(),
        "starting leave-one-out evaluation"
    );

    let outcomes: Vec<Option<f64>> = sampled
        .par_iter()
        .map(|&holdout| {
            catch_unwind(AssertUnwindSafe(|| {
                evaluate_holdout(casebase, &strategy_for, holdout, config)
            }))
            .map_err(|_| warn!(case = holdout, "holdout evaluation panicked, counted as zero"))
            .ok()
        })
        .collect();

    let failures = outcomes.iter().filter(|outcome| outcome.is_none()).count();
    let sum: f64 = outcomes.iter().map(|outcome| outcome.unwrap_or(0.0)).sum();
    EvaluationReport {
        mean_similarity: sum / sample_size as f64,
        cases_tested: sample_size,
        failures,
    }
}

fn evaluate_holdout<F, S>(
    casebase: &CaseBase,
    strategy_for: &F,
    holdout: CaseId,
    config: &EvaluationConfig,
) -> f64
where
    F: Fn(&CaseBase) -> S,
    S: SimilarityStrategy,
{
    let Some(held) = casebase.get(holdout) else {
        return 0.0;
    };
    let query = Query::from_case(held);
    let reduced = casebase.without(holdout);
    let strategy = strategy_for(&reduced);
    let hits = retrieve(&reduced, &query, &strategy, config.limit);
    match config.policy {
        AggregationPolicy::MeanSimilarity => hits.mean_score(),
        AggregationPolicy::ExactMatch => {
            let found = hits.iter().any(|entry| {
                reduced
                    .get(entry.id)
                    .map_or(false, |case| case.tokens == held.tokens)
            });
            if found {
                1.0
            } else {
                0.0
            }
        }
    }
}
