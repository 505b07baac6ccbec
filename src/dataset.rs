use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::normalize::{parse_listing, Normalizer};
use crate::retrieval::case::{Case, CaseBase};

/// Errors produced while loading the recipe dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset: {0}")]
    Io(#[from] io::Error),
    #[error("failed to decode dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// One raw row of the recipe dataset. The id lives in the unnamed leading
/// column the dataset export ships with.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    #[serde(rename = "", alias = "Id")]
    pub id: u64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Ingredients")]
    pub ingredients: String,
    #[serde(rename = "Instructions")]
    pub instructions: String,
    #[serde(rename = "Image_Name")]
    pub image_name: String,
    #[serde(rename = "Cleaned_Ingredients")]
    pub cleaned_ingredients: String,
}

impl RecipeRecord {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.ingredients.trim().is_empty()
            && !self.instructions.trim().is_empty()
            && !self.image_name.trim().is_empty()
            && !self.cleaned_ingredients.trim().is_empty()
    }
}

/// Load the recipe dataset from a CSV file into a case base.
pub fn load_casebase(
    path: impl AsRef<Path>,
    normalizer: &Normalizer,
) -> Result<CaseBase, DatasetError> {
    let file = File::open(path.as_ref())?;
    read_casebase(file, normalizer)
}

/// Read recipe rows from any CSV source into a case base.
///
/// Rows with missing fields and rows that fail to decode are dropped.
/// Rows whose ingredient listing cannot be parsed are kept with an empty
/// token set; they contribute no positive similarity but must not abort
/// the batch.
pub fn read_casebase<R: Read>(
    reader: R,
    normalizer: &Normalizer,
) -> Result<CaseBase, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut casebase = CaseBase::new();
    let mut dropped = 0usize;
    for row in csv_reader.deserialize::<RecipeRecord>() {
        let record = match row {
            Ok(record) => record,
            Err(err) => {
                dropped += 1;
                warn!(%err, "skipping undecodable row");
                continue;
            }
        };
        if !record.is_complete() {
            dropped += 1;
            continue;
        }
        casebase.insert(case_from_record(record, normalizer));
    }
    info!(cases = casebase.len(), dropped, "loaded recipe dataset");
    Ok(casebase)
}

/// Map one dataset row into a case.
pub fn case_from_record(record: RecipeRecord, normalizer: &Normalizer) -> Case {
    let phrases = parse_listing(&record.cleaned_ingredients.to_lowercase()).unwrap_or_default();
    let tokens = normalizer.normalize_phrases(&phrases);
    Case::new(record.id, phrases, tokens).with_payload(
        record.title,
        record.instructions,
        record.image_name,
    )
}
