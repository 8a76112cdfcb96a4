use clinical_summarizer::nlp::text::{
    case_description, clean_sentence, collapse_newlines, normalize_legacy_response,
    redact_self_identification, strip_markers, strip_prompt_echo, strip_punctuation,
};
use proptest::prelude::*;

#[test]
fn punctuation_is_removed() {
    assert_eq!(
        strip_punctuation("Temp 37°C, Pulse 120 (rapid)!"),
        "Temp 37°C Pulse 120 rapid"
    );
}

#[test]
fn line_breaks_become_single_spaces() {
    assert_eq!(collapse_newlines("Summary:\r\nFever\n\nCough"), "Summary: Fever Cough");
}

#[test]
fn emphasis_markers_are_removed() {
    assert_eq!(strip_markers("**Diagnosis:** DKA"), "Diagnosis: DKA");
    assert_eq!(strip_markers("***"), "*");
}

#[test]
fn markers_are_stripped_before_punctuation() {
    assert_eq!(
        clean_sentence("**Summary:**\nA 4-year-old with 5% burns."),
        "summary a 4yearold with 5 burns"
    );
}

#[test]
fn self_identification_sentences_are_redacted() {
    let summary = "I am a nurse with 18 years of experience. Child has burns. Paracetamol given";
    assert_eq!(
        redact_self_identification(summary),
        "Child has burns.  Paracetamol given"
    );
    assert_eq!(
        redact_self_identification("i AM a NURSE here. Fever"),
        "Fever"
    );
}

#[test]
fn summaries_without_the_phrase_only_get_rejoined() {
    assert_eq!(
        redact_self_identification("Child has burns. Paracetamol given"),
        "Child has burns.  Paracetamol given"
    );
    assert_eq!(redact_self_identification("No periods here"), "No periods here");
}

#[test]
fn legacy_response_is_single_line_lowercase() {
    assert_eq!(
        normalize_legacy_response("#### **Summary:**\n\nChild WITH burns\n"),
        "summary: child with burns"
    );
}

#[test]
fn case_description_drops_the_introduction() {
    let prompt = "I am a nurse in Kenya. A child has burns.\nAlert and crying.";
    assert_eq!(case_description(prompt), " A child has burns  Alert and crying ");
}

#[test]
fn echoed_prompt_is_removed() {
    let prompt = "Clinical note:\nfever\n\n----\nResponse:\n";
    let output = format!("{prompt}Summary:\nFever.");
    assert_eq!(strip_prompt_echo(&output, prompt), "Summary:\nFever.");
    assert_eq!(strip_prompt_echo(" Fever. ", ""), "Fever.");
    assert_eq!(strip_prompt_echo("Fever.", prompt), "Fever.");
}

proptest! {
    #[test]
    fn clean_sentence_is_idempotent(text in "[ -~\\n\\r]{0,120}") {
        let once = clean_sentence(&text);
        prop_assert_eq!(clean_sentence(&once), once);
    }

    #[test]
    fn stripping_helpers_are_idempotent(text in "[ -~\\n\\r]{0,120}") {
        let punct = strip_punctuation(&text);
        prop_assert_eq!(strip_punctuation(&punct), punct.clone());
        let lines = collapse_newlines(&text);
        prop_assert_eq!(collapse_newlines(&lines), lines.clone());
        let markers = strip_markers(&text);
        prop_assert_eq!(strip_markers(&markers), markers.clone());
    }

    #[test]
    fn redaction_removes_every_mention(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
        let summary = format!("{prefix}. {prefix} I am a nurse {suffix}. {suffix}");
        prop_assert!(!redact_self_identification(&summary).to_lowercase().contains("i am a nurse"));
    }
}
