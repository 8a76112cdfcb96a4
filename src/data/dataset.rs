//! Clinical prompt dataset loading.

use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const PROMPT_COLUMN: &str = "Prompt";
pub const GOLD_COLUMN: &str = "Clinician";
pub const INDEX_COLUMN: &str = "Master_Index";

/// One nurse-written case paired with the clinician's reference summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub master_index: Option<String>,
    pub prompt: String,
    pub gold_summary: String,
}

/// One case awaiting a generated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub master_index: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Master_Index", default)]
    master_index: Option<String>,
    #[serde(rename = "Prompt", default)]
    prompt: Option<String>,
    #[serde(rename = "Clinician", default)]
    clinician: Option<String>,
}

/// Load a dataset with both a note and a reference summary per row.
///
/// Rows where either value is missing or blank are dropped.
pub fn load_dataset(path: &Path) -> Result<Vec<ClinicalRecord>> {
    let rows = read_rows(path, &[PROMPT_COLUMN, GOLD_COLUMN])?;
    let total = rows.len();
    let records: Vec<ClinicalRecord> = rows
        .into_iter()
        .filter_map(|row| {
            Some(ClinicalRecord {
                master_index: row.master_index,
                prompt: non_blank(row.prompt)?,
                gold_summary: non_blank(row.clinician)?,
            })
        })
        .collect();
    log_dropped(path, total, records.len());
    Ok(records)
}

/// Load a dataset where only the note column is required.
pub fn load_prompts(path: &Path) -> Result<Vec<PromptRecord>> {
    let rows = read_rows(path, &[PROMPT_COLUMN])?;
    let total = rows.len();
    let records: Vec<PromptRecord> = rows
        .into_iter()
        .filter_map(|row| {
            Some(PromptRecord {
                master_index: row.master_index,
                prompt: non_blank(row.prompt)?,
            })
        })
        .collect();
    log_dropped(path, total, records.len());
    Ok(records)
}

fn read_rows(path: &Path, required: &[&str]) -> Result<Vec<RawRow>> {
    if !path.exists() {
        bail!("CSV file not found: {}", path.display());
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!(
            "CSV missing required columns {missing:?}; found {:?}, expected {required:?}",
            headers.iter().collect::<Vec<_>>()
        );
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRow>() {
        rows.push(result.with_context(|| format!("reading {}", path.display()))?);
    }
    Ok(rows)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn log_dropped(path: &Path, total: usize, kept: usize) {
    if kept < total {
        warn!(path = %path.display(), dropped = total - kept, "dropped rows with missing values");
    }
    info!(path = %path.display(), rows = kept, "loaded dataset");
}
