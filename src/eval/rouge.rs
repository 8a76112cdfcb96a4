//! ROUGE-1 and ROUGE-L overlap scores.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Tokens shorter than this are compared as-is.
const MIN_STEM_LEN: usize = 4;

/// Precision, recall and F-measure of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Score {
    fn from_overlap(overlap: usize, candidate_len: usize, reference_len: usize) -> Self {
        if overlap == 0 || candidate_len == 0 || reference_len == 0 {
            return Self::default();
        }
        let precision = overlap as f64 / candidate_len as f64;
        let recall = overlap as f64 / reference_len as f64;
        let fmeasure = 2.0 * precision * recall / (precision + recall);
        Self {
            precision,
            recall,
            fmeasure,
        }
    }
}

/// Lowercase and split on anything that is not an ASCII letter or digit.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens as scored: [`tokenize`] output with every token of four or more
/// characters reduced to its English stem.
pub fn scoring_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .map(|token| {
            if token.len() >= MIN_STEM_LEN {
                STEMMER.stem(&token).into_owned()
            } else {
                token
            }
        })
        .collect()
}

/// Unigram overlap between `reference` and `candidate`.
pub fn rouge1(reference: &str, candidate: &str) -> Score {
    let reference = scoring_tokens(reference);
    let candidate = scoring_tokens(candidate);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &reference {
        *counts.entry(token.as_str()).or_default() += 1;
    }
    let mut overlap = 0;
    for token in &candidate {
        if let Some(count) = counts.get_mut(token.as_str()) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }
    Score::from_overlap(overlap, candidate.len(), reference.len())
}

/// Longest-common-subsequence overlap between `reference` and `candidate`.
pub fn rouge_l(reference: &str, candidate: &str) -> Score {
    let reference = scoring_tokens(reference);
    let candidate = scoring_tokens(candidate);
    let lcs = lcs_len(&reference, &candidate);
    Score::from_overlap(lcs, candidate.len(), reference.len())
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
