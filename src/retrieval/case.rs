use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;

/// Stable, unique identifier of a case.
pub type CaseId = u64;

/// One stored recipe: an ingredient token set plus the payload carried
/// through unchanged. Immutable once inserted into a `CaseBase`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub id: CaseId,
    /// Raw ingredient phrases as they appear in the dataset.
    pub ingredients: Vec<String>,
    /// Normalized ingredient tokens.
    pub tokens: BTreeSet<String>,
    pub title: String,
    pub instructions: String,
    pub image: String,
}

impl Case {
    pub fn new(id: CaseId, ingredients: Vec<String>, tokens: BTreeSet<String>) -> Self {
        Case {
            id,
            ingredients,
            tokens,
            title: String::new(),
            instructions: String::new(),
            image: String::new(),
        }
    }

    pub fn with_payload(mut self, title: String, instructions: String, image: String) -> Self {
        self.title = title;
        self.instructions = instructions;
        self.image = image;
        self
    }
}

/// Insertion-ordered collection of cases.
///
/// Iteration order is stable within a run, which keeps holdout sampling
/// reproducible and retrieval tie-breaks deterministic. Cases are shared via
/// `Arc`, so the reduced copies built by the leave-one-out evaluator are
/// cheap pointer clones.
#[derive(Debug, Clone, Default)]
pub struct CaseBase {
    cases: IndexMap<CaseId, Arc<Case>>,
}

impl CaseBase {
    pub fn new() -> Self {
        CaseBase {
            cases: IndexMap::new(),
        }
    }

    /// Insert a case, replacing any previous case with the same id.
    pub fn insert(&mut self, case: Case) -> Option<Arc<Case>> {
        self.cases.insert(case.id, Arc::new(case))
    }

    pub fn get(&self, id: CaseId) -> Option<&Case> {
        self.cases.get(&id).map(Arc::as_ref)
    }

    pub fn contains(&self, id: CaseId) -> bool {
        self.cases.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = CaseId> + '_ {
        self.cases.keys().copied()
    }

    /// Cases in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Case> {
        self.cases.values().map(Arc::as_ref)
    }

    /// A collection with one case removed. Shares case storage with `self`
    /// and preserves the remaining insertion order.
    pub fn without(&self, id: CaseId) -> CaseBase {
        let cases = self
            .cases
            .iter()
            .filter(|(key, _)| **key != id)
            .map(|(key, case)| (*key, Arc::clone(case)))
            .collect();
        CaseBase { cases }
    }
}

impl FromIterator<Case> for CaseBase {
    fn from_iter<I: IntoIterator<Item = Case>>(iter: I) -> Self {
        let mut casebase = CaseBase::new();
        for case in iter {
            casebase.insert(case);
        }
        casebase
    }
}

/// The transient ingredient set supplied by a caller. Terms may be raw
/// phrases; strategies normalize as needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub terms: BTreeSet<String>,
}

impl Query {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Query built from a case's own tokens, as used by the leave-one-out
    /// evaluator.
    pub fn from_case(case: &Case) -> Self {
        Query {
            terms: case.tokens.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
