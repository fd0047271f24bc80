//! Fixed-width text windowing for the summarizer.
//!
//! Boundaries are counted in characters, never bytes, so a chunk never splits
//! a UTF-8 sequence. Sentences may still be cut in half.

/// Whether `text` has anything worth summarizing.
#[must_use]
pub fn has_readable_text(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Split `text` into consecutive slices of at most `chunk_size` characters.
///
/// Concatenating the result reproduces `text` exactly. Empty input yields no
/// chunks.
#[must_use]
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / chunk_size + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// Leading window of at most `max_chars` characters.
#[must_use]
pub fn leading_window(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
