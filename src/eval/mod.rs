//! Evaluation of generated summaries against clinician-written references.

pub mod rouge;
pub mod tracking;

use std::path::Path;

use anyhow::{Context, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{data::dataset::ClinicalRecord, nlp::SummarizerService};

/// One evaluated sample, written as a row of the results CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub prompt: String,
    pub gold_summary: String,
    pub generated_summary: String,
    pub rouge1: f64,
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
}

/// Mean scores over an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EvaluationSummary {
    pub samples: usize,
    pub mean_rouge1: f64,
    #[serde(rename = "mean_rougeL")]
    pub mean_rouge_l: f64,
}

impl EvaluationSummary {
    pub fn from_records(records: &[EvaluationRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = records.len() as f64;
        Self {
            samples: records.len(),
            mean_rouge1: records.iter().map(|r| r.rouge1).sum::<f64>() / n,
            mean_rouge_l: records.iter().map(|r| r.rouge_l).sum::<f64>() / n,
        }
    }
}

/// Draw `size` records with a seeded RNG; everything is kept when `size` covers the dataset.
pub fn sample(records: Vec<ClinicalRecord>, size: Option<usize>, seed: u64) -> Vec<ClinicalRecord> {
    match size {
        Some(size) if size > 0 && size < records.len() => {
            let mut rng = StdRng::seed_from_u64(seed);
            records.choose_multiple(&mut rng, size).cloned().collect()
        }
        _ => records,
    }
}

/// Score `generated` against `gold`.
pub fn score(prompt: &str, gold: &str, generated: String) -> EvaluationRecord {
    EvaluationRecord {
        prompt: prompt.to_string(),
        gold_summary: gold.to_string(),
        rouge1: rouge::rouge1(gold, &generated).fmeasure,
        rouge_l: rouge::rouge_l(gold, &generated).fmeasure,
        generated_summary: generated,
    }
}

/// Summarize every record in order and score it. A backend failure aborts the run.
#[instrument(skip_all, fields(mode = %service.mode(), samples = records.len()))]
pub async fn evaluate(
    service: &SummarizerService,
    records: &[ClinicalRecord],
) -> Result<Vec<EvaluationRecord>> {
    let mut results = Vec::with_capacity(records.len());
    for record in records {
        let generated = service
            .summarize(&record.prompt)
            .await
            .with_context(|| format!("summarizing sample {}", results.len() + 1))?;
        let scored = score(&record.prompt, &record.gold_summary, generated);
        info!(
            sample = results.len() + 1,
            total = records.len(),
            rouge_l = %format!("{:.3}", scored.rouge_l),
            "scored sample"
        );
        results.push(scored);
    }
    Ok(results)
}

pub fn write_results(records: &[EvaluationRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("create {path:?}"))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "wrote evaluation results");
    Ok(())
}
