//! Post-processing: deterministic cleanup of model lead-in phrases.
//!
//! ## Why is post-processing necessary?
//!
//! The prompt explicitly forbids commentary, yet models still regularly
//! open with "Here's the Hinglish translation of the text from the
//! image:" or similar. Scrubbing those prefixes here, deterministically,
//! keeps the prompt focused on the transliteration task instead of on
//! formatting edge-cases — and makes the behaviour testable without a
//! live model.
//!
//! The patterns are anchored to the start of the text and applied in a
//! fixed order, each case-insensitively, followed by a whitespace trim.
//! Cleaning is idempotent: cleaned text never begins with any of the
//! patterns, so a second pass is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

/// Known lead-in phrases, longest/most-specific first.
///
/// `[’']` accepts both the typewriter apostrophe and the curly one the
/// model sometimes emits.
static LEAD_IN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^Here[’']s the Hinglish translation of the text from the image:\s*",
        r"(?i)^Okay, here[’']s the Hinglish translation of the text from the image:\s*",
        r"(?i)^The Hinglish translation of the text is:\s*",
        r"(?i)^Hinglish translation:\s*",
        r"(?i)^Here[’']s the translation:\s*",
        r"(?i)^Translation:\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("lead-in pattern must compile"))
    .collect()
});

/// Strip known boilerplate lead-in phrases from a raw model response and
/// trim surrounding whitespace.
pub fn clean_response(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in LEAD_IN_PATTERNS.iter() {
        cleaned = pattern.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_standard_lead_in() {
        let raw = "Here's the Hinglish translation of the text from the image: Namaste";
        assert_eq!(clean_response(raw), "Namaste");
    }

    #[test]
    fn strips_okay_variant() {
        let raw = "Okay, here's the Hinglish translation of the text from the image:\nAap kaise hain?";
        assert_eq!(clean_response(raw), "Aap kaise hain?");
    }

    #[test]
    fn strips_short_translation_prefix() {
        assert_eq!(clean_response("Translation: Mera naam Sourabh hai"), "Mera naam Sourabh hai");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(clean_response("HINGLISH TRANSLATION: Yeh ek udaharan hai."), "Yeh ek udaharan hai.");
    }

    #[test]
    fn curly_apostrophe_accepted() {
        let raw = "Here’s the translation: Namaste";
        assert_eq!(clean_response(raw), "Namaste");
    }

    #[test]
    fn mid_text_occurrences_untouched() {
        // Anchored patterns must not eat the phrase when it appears later.
        let raw = "Namaste. Translation: shabd ka matlab anuvaad hota hai";
        assert_eq!(clean_response(raw), raw);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(clean_response("  Namaste  \n"), "Namaste");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw = "Okay, here's the Hinglish translation of the text from the image: Namaste ji";
        let once = clean_response(raw);
        let twice = clean_response(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "Namaste ji");
    }

    #[test]
    fn empty_response_stays_empty() {
        assert_eq!(clean_response(""), "");
        assert_eq!(clean_response("Translation:   "), "");
    }
}
