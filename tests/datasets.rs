mod common;

use std::{fs, path::PathBuf};

use clinical_summarizer::{
    config::Mode,
    data::{dataset, finetune, legacy},
    eval::{self, EvaluationSummary},
    nlp::prompt,
};
use common::MockBackend;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

const DATASET: &str = "Master_Index,Prompt,Clinician\n\
ID_1,\"I am a nurse. Child with burns.\",Superficial burns.\n\
ID_2,,Missing prompt\n\
ID_3,\"I am a nurse. Girl with DKA.\",\n\
ID_4,\"I am a nurse. Adult with cough.\",Cough x2 weeks.\n";

#[test]
fn dataset_drops_rows_with_missing_values() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "clinical_prompts.csv", DATASET);

    let records = dataset::load_dataset(&path).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].master_index.as_deref(), Some("ID_1"));
    assert_eq!(records[0].prompt, "I am a nurse. Child with burns.");
    assert_eq!(records[1].gold_summary, "Cough x2 weeks.");
}

#[test]
fn dataset_requires_prompt_and_clinician_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "bad.csv", "Prompt,Notes\nhello,world\n");

    let err = dataset::load_dataset(&path).unwrap_err().to_string();
    assert!(err.contains("Clinician"), "{err}");

    let prompts = dataset::load_prompts(&path).unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].master_index, None);
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = dataset::load_dataset(&dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("CSV file not found"));
}

#[test]
fn finetune_export_writes_one_json_object_per_line() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "clinical_prompts.csv", DATASET);
    let records = dataset::load_dataset(&path).unwrap();

    let out = finetune::export_jsonl(&records, &dir.path().join("processed")).unwrap();

    assert!(out.ends_with("processed/train.jsonl"));
    let lines: Vec<finetune::FinetuneRecord> = fs::read_to_string(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].input_text, "I am a nurse. Child with burns.");
    assert_eq!(lines[0].output_text, "Superficial burns.");
}

#[test]
fn legacy_response_prefixes_case_description() {
    let composed = legacy::compose_response(
        "I am a nurse. Child with\nburns.",
        "**Summary:**\n\nBurns 5%\n",
    );
    assert_eq!(composed, "summary  child with burns  summary: burns 5%");
}

#[tokio::test]
async fn legacy_job_uses_legacy_prompt_and_writes_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "test_raw.csv",
        "Master_Index,Prompt\nID_9,\"I am a nurse. Child with burns.\"\n",
    );
    let records = dataset::load_prompts(&path).unwrap();
    let backend = MockBackend::replying(["Summary:\nBurns."]);
    let service = backend.service(Mode::Local);

    let rows = legacy::run(&service, &records).await.unwrap();
    let out = dir.path().join("out/result.csv");
    legacy::write_rows(&rows, &out).unwrap();

    assert_eq!(
        backend.prompts.lock().unwrap().as_slice(),
        [prompt::build_legacy("I am a nurse. Child with burns.")]
    );
    let written = fs::read_to_string(out).unwrap();
    assert_eq!(
        written,
        "Master_Index,Clinician\nID_9,summary  child with burns  summary: burns.\n"
    );
}

#[tokio::test]
async fn evaluation_scores_each_sample_and_writes_results() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "clinical_prompts.csv", DATASET);
    let records = dataset::load_dataset(&path).unwrap();
    let backend = MockBackend::replying(["Superficial burns.", "Fever only."]);
    let service = backend.service(Mode::Gemini);

    let results = eval::evaluate(&service, &records).await.unwrap();
    let out = dir.path().join("evaluation_results.csv");
    eval::write_results(&results, &out).unwrap();

    assert_eq!(results.len(), 2);
    assert!((results[0].rouge1 - 1.0).abs() < 1e-9);
    assert!((results[0].rouge_l - 1.0).abs() < 1e-9);
    assert_eq!(results[1].rouge1, 0.0);

    let summary = EvaluationSummary::from_records(&results);
    assert_eq!(summary.samples, 2);
    assert!((summary.mean_rouge1 - 0.5).abs() < 1e-9);

    let written = fs::read_to_string(out).unwrap();
    assert!(written.starts_with("prompt,gold_summary,generated_summary,rouge1,rougeL\n"));
}

#[tokio::test]
async fn evaluation_aborts_on_backend_failure() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "clinical_prompts.csv", DATASET);
    let records = dataset::load_dataset(&path).unwrap();
    let backend = MockBackend::scripted([Err("network error".to_string())]);
    let service = backend.service(Mode::Gemini);

    let err = eval::evaluate(&service, &records).await.unwrap_err();
    assert!(format!("{err:#}").contains("network error"));
    assert_eq!(backend.call_count(), 1);
}

#[test]
fn sampling_is_seeded_and_bounded() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "clinical_prompts.csv", DATASET);
    let records = dataset::load_dataset(&path).unwrap();

    let a = eval::sample(records.clone(), Some(1), 42);
    let b = eval::sample(records.clone(), Some(1), 42);
    assert_eq!(a, b);
    assert_eq!(a.len(), 1);

    assert_eq!(eval::sample(records.clone(), Some(10), 42), records);
    assert_eq!(eval::sample(records.clone(), Some(0), 42), records);
    assert_eq!(eval::sample(records.clone(), None, 42), records);
}
