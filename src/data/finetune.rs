//! JSONL export of the dataset for fine-tuning jobs.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::dataset::ClinicalRecord;

pub const TRAIN_FILE: &str = "train.jsonl";

/// One training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinetuneRecord {
    pub input_text: String,
    pub output_text: String,
}

impl From<&ClinicalRecord> for FinetuneRecord {
    fn from(record: &ClinicalRecord) -> Self {
        Self {
            input_text: record.prompt.clone(),
            output_text: record.gold_summary.clone(),
        }
    }
}

/// Write `train.jsonl` into `output_dir`, one record per line.
pub fn export_jsonl(records: &[ClinicalRecord], output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let path = output_dir.join(TRAIN_FILE);
    let file = File::create(&path).with_context(|| format!("create {path:?}"))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        let line = serde_json::to_string(&FinetuneRecord::from(record))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(path = %path.display(), count = records.len(), "saved fine-tuning dataset");
    Ok(path)
}
