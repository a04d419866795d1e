//! Combining typed and extracted text into the conversation the analyzer sees.

/// Number of trailing characters kept before analysis.
pub const DEFAULT_WINDOW_CHARS: usize = 9000;

/// Separator placed between typed text and screenshot text.
pub const PART_SEPARATOR: &str = "\n\n";

/// Joins trimmed typed text and trimmed clean transcript.
///
/// Returns `None` when both are empty, which callers treat as
/// [`crate::BondaError::NoInputProvided`].
pub fn combine(typed_text: &str, clean_transcript: &str) -> Option<String> {
    let parts: Vec<&str> = [typed_text.trim(), clean_transcript.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(PART_SEPARATOR))
    }
}

/// Keeps only the last `max_chars` characters of `text`.
///
/// Counts Unicode scalar values, so a cut never lands inside a multi-byte
/// character. Text within the window is returned unchanged.
pub fn tail_truncate(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let skip = total - max_chars;
    match text.char_indices().nth(skip) {
        Some((byte_index, _)) => &text[byte_index..],
        None => "",
    }
}
