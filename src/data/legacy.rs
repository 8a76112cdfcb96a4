//! Legacy batch job producing lower-cased, single-line summaries for a raw test split.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::nlp::{prompt, text, SummarizerService};

use super::dataset::PromptRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyRow {
    #[serde(rename = "Master_Index")]
    pub master_index: String,
    #[serde(rename = "Clinician")]
    pub clinician: String,
}

/// Combine the case description with the model reply and normalize the result.
pub fn compose_response(prompt_text: &str, reply: &str) -> String {
    let description = text::case_description(prompt_text);
    text::normalize_legacy_response(&format!("summary {description} {}", reply.trim()))
}

/// Generate one row per record, sequentially. Stops at the first backend failure.
pub async fn run(service: &SummarizerService, records: &[PromptRecord]) -> Result<Vec<LegacyRow>> {
    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let reply = service
            .generate(&prompt::build_legacy(&record.prompt))
            .await
            .with_context(|| format!("generating row {idx}"))?;
        rows.push(LegacyRow {
            master_index: record.master_index.clone().unwrap_or_default(),
            clinician: compose_response(&record.prompt, &reply),
        });
        info!(row = idx + 1, total = records.len(), "processed test row");
    }
    Ok(rows)
}

pub fn write_rows(rows: &[LegacyRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("create {path:?}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote legacy summaries");
    Ok(())
}
