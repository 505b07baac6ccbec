use std::env;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use recipe_retrieval::{
    evaluate_leave_one_out, load_casebase, retrieve, CaseBase, EvaluationConfig, Hits, Normalizer,
    OverlapSimilarity, Query, TfIdfSimilarity, DEFAULT_RESULT_LIMIT,
};

const DEFAULT_DATASET: &str = "datasets/recipes.csv";

/// Ingredients on hand for the demo retrieval.
const SAMPLE_QUERY: &[&str] = &[
    "cup of chopped tomatoes",
    "salt to taste",
    "cup of olive oil",
    "cloves of garlic",
    "teaspoon of sugar",
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_DATASET.to_string());
    let normalizer = Normalizer::new();
    let casebase = load_casebase(&path, &normalizer)
        .with_context(|| format!("loading dataset from {path}"))?;
    info!(cases = casebase.len(), "case base ready");

    let query = Query::new(SAMPLE_QUERY.iter().copied());
    println!("searching recipes for: {SAMPLE_QUERY:?}");

    let jaccard = OverlapSimilarity::jaccard();
    let hits = retrieve(&casebase, &query, &jaccard, DEFAULT_RESULT_LIMIT);
    print_hits("jaccard", &casebase, &hits);

    let tfidf = TfIdfSimilarity::fit(&casebase);
    let hits = retrieve(&casebase, &query, &tfidf, DEFAULT_RESULT_LIMIT);
    print_hits("tf-idf", &casebase, &hits);

    let config = EvaluationConfig::default();
    let report = evaluate_leave_one_out(&casebase, TfIdfSimilarity::fit, &config);
    println!(
        "\nleave-one-out (tf-idf): mean similarity {:.2}% over {} cases ({} failures)",
        report.mean_similarity * 100.0,
        report.cases_tested,
        report.failures
    );

    Ok(())
}

fn print_hits(label: &str, casebase: &CaseBase, hits: &Hits) {
    println!("\ntop {} recipes ({label}):", hits.len());
    for (position, entry) in hits.iter().enumerate() {
        let title = casebase
            .get(entry.id)
            .map(|case| case.title.as_str())
            .unwrap_or("<unknown>");
        println!(
            "{}. {} (id: {}, similarity: {:.2}%)",
            position + 1,
            title,
            entry.id,
            entry.score * 100.0
        );
    }
}
