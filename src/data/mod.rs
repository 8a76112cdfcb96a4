//! Dataset ingestion and export jobs.

pub mod dataset;
pub mod finetune;
pub mod legacy;
