//! String post-processing applied to generated and reference summaries.
//!
//! Marker and newline cleanup must run before punctuation stripping: stripping
//! punctuation first would already remove the asterisks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Emphasis marker emitted by chat models.
pub const EMPHASIS_MARKER: &str = "**";

/// Boilerplate phrase nurses use to introduce themselves.
pub const SELF_IDENTIFICATION: &str = "i am a nurse";

/// Remove every ASCII punctuation character.
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Replace each run of `\n`/`\r` characters with a single space.
pub fn collapse_newlines(text: &str) -> String {
    static LINE_BREAKS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));
    LINE_BREAKS.replace_all(text, " ").into_owned()
}

/// Remove every occurrence of the `**` emphasis marker.
pub fn strip_markers(text: &str) -> String {
    text.replace(EMPHASIS_MARKER, "")
}

/// Drop every sentence mentioning the self-identification phrase, case-insensitively.
pub fn redact_self_identification(summary: &str) -> String {
    summary
        .split('.')
        .filter(|sentence| !sentence.to_lowercase().contains(SELF_IDENTIFICATION))
        .collect::<Vec<_>>()
        .join(". ")
        .trim()
        .to_string()
}

/// Full cleanup used before scoring: newlines, markers, punctuation, then case folding.
pub fn clean_sentence(text: &str) -> String {
    let text = collapse_newlines(text);
    let text = strip_markers(&text);
    let text = strip_punctuation(&text);
    text.to_lowercase().trim().to_string()
}

/// Post-processing applied by the legacy batch job to a raw model reply.
pub fn normalize_legacy_response(text: &str) -> String {
    text.replace("\n\n", " ")
        .replace('\n', " ")
        .replace(EMPHASIS_MARKER, "")
        .replace("####", "")
        .trim()
        .to_lowercase()
}

/// Everything after the first sentence of a dataset prompt, on one line.
///
/// Prompts open with the nurse's self-introduction, which this discards.
pub fn case_description(prompt: &str) -> String {
    prompt
        .split('.')
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ")
        .replace("\n\n", " ")
        .replace('\n', " ")
}

/// Remove a verbatim echo of `prompt` from a generation.
///
/// Local causal models frequently repeat the input before the continuation.
pub fn strip_prompt_echo(output: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return output.trim().to_string();
    }
    output.replace(prompt, "").trim().to_string()
}
