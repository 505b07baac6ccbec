/// This crate is a case-based recipe retrieval engine.
/// Given a query set of ingredients and a collection of recipe cases, it
/// ranks the cases by a pluggable similarity score and returns the top-K,
/// and it can evaluate a whole collection with a parallel leave-one-out run.
pub mod dataset;
pub mod normalize;
pub mod retrieval;

/// Ingredient Normalizer
/// Turns raw ingredient text (plain phrases or a string-encoded phrase list)
/// into a canonical token set: lowercase, letters only, stopwords removed,
/// Snowball-stemmed. Holds its stopword/stemmer state as an immutable
/// configuration object that is passed explicitly to whatever needs it.
/// Normalization is idempotent, and malformed listings degrade to an empty
/// set instead of failing a batch.
pub use normalize::Normalizer;

/// Case model
/// `Case` is one stored recipe: a normalized ingredient token set, the raw
/// ingredient phrases, and the payload (title, instructions, image) carried
/// through unchanged. `CaseBase` is the insertion-ordered collection the
/// engine retrieves from; its iteration order is stable within a run, which
/// keeps sampling reproducible and tie-breaks deterministic. `Query` is the
/// transient ingredient set supplied per retrieval call.
pub use retrieval::case::{Case, CaseBase, CaseId, Query};

/// Similarity Strategies
/// `SimilarityStrategy` is the single scoring interface: case × query →
/// score in [0, 1]. Two conforming variants are provided:
/// - `OverlapSimilarity`, with a selectable `OverlapPolicy` (substring
///   membership with fault counting, or the default Jaccard index)
/// - `TfIdfSimilarity`, a stateful model fitted once per case collection
///   (vocabulary + smoothed IDF + one L2-normalized vector per case),
///   scored by cosine similarity
pub use retrieval::similarity::{
    OverlapPolicy, OverlapSimilarity, SimilarityStrategy, TfIdfSimilarity,
};

/// Retrieval Engine
/// `retrieve` scores every case in a collection against a query, sorts
/// descending with stable ties and truncates to the requested limit.
/// `Hits`/`HitEntry` carry the ordered (case id, score) results.
pub use retrieval::engine::{retrieve, HitEntry, Hits, DEFAULT_RESULT_LIMIT};

/// Leave-One-Out Evaluator
/// Draws a reproducible sample of holdout cases, rebuilds the similarity
/// strategy against each reduced collection, runs retrieval per holdout on
/// a rayon worker pool, and aggregates a mean under a selectable
/// `AggregationPolicy`. Worker failures are isolated and reported, never
/// fatal.
pub use retrieval::evaluate::{
    evaluate_leave_one_out, AggregationPolicy, EvaluationConfig, EvaluationReport,
};

/// Dataset loading
/// Thin CSV ingestion for the recipe dataset: decodes rows, drops
/// incomplete ones, tolerates malformed ingredient listings and maps the
/// rest into a `CaseBase`.
pub use dataset::{load_casebase, read_casebase, DatasetError, RecipeRecord};
