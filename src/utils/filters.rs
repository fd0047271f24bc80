/// Whether decoded dimensions are large enough to be page content rather
/// than an icon, spacer or tracking pixel.
#[must_use]
pub fn is_content_sized(width: u32, height: u32, min_side: u32) -> bool {
    width >= min_side && height >= min_side
}

/// Trimmed caption, or `None` when the model produced nothing usable.
#[must_use]
pub fn usable_caption(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
