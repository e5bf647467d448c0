//! Instruction prompt for the Hindi→Hinglish recognition call.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking the worked examples or the
//!    no-commentary instruction requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    a live model call.
//!
//! Callers can override it via
//! [`crate::config::ConversionConfig::prompt`]; the constant here is used
//! only when no override is provided. Despite the instruction, models
//! still occasionally prepend lead-in commentary — that is scrubbed
//! deterministically in [`crate::pipeline::postprocess`].

/// Default instruction prompt sent alongside each page image.
///
/// Role framing, four worked examples, and an explicit instruction to omit
/// lead-in commentary.
pub const HINGLISH_PROMPT: &str = r#"You are an expert Hinglish translator. You will receive images containing Hindi text, and your task is to accurately convert that text into Hinglish (Hindi written using the Roman alphabet). Pay close attention to context and ensure the transliteration is as natural and readable as possible.

Here are a few examples of Hindi text and their Hinglish conversions:
**Examples:**
***Image Text (Hindi):** नमस्ते
    **Hinglish:** Namaste
***Image Text (Hindi):** आप कैसे हैं?
    **Hinglish:** Aap kaise hain?
***Image Text (Hindi):** मेरा नाम...
    **Hinglish:** Mera naam...
***Image Text (Hindi):** यह एक उदाहरण है।
    **Hinglish:** Yeh ek udaharan hai.

Now, convert the text in the following image to Hinglish.
NOTE -
Do NOT add lead-in phrases like "Here's the Hinglish translation of the text from the image:" or "Okay, here's the Hinglish translation of the text from the image:" — output only the converted text."#;
