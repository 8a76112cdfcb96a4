//! Structured clinical summaries from nurse-written case notes.
//!
//! A [`nlp::SummarizerService`] builds a few-shot prompt, sends it to the
//! backend chosen by [`config::Mode`] and returns the cleaned reply. The
//! remaining modules wrap it in an HTTP API, a CLI and dataset jobs.

pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod logging;
pub mod nlp;

pub use error::{SummarizerError, SummarizerResult};
