//! MIME and `data:` URL utilities shared across modules

use base64::{Engine as _, engine::general_purpose};

use crate::errors::DigestError;

/// Returns lowercase, parameter-stripped, canonical mime (`image/jpg` ⇒ `image/jpeg`).
#[must_use]
pub fn canonicalize_mime(mime: &str) -> String {
    let main = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match main.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}

/// Whether a declared content type claims to be an image. Informational only:
/// acceptance is decided by decoding, not by this header.
#[must_use]
pub fn declares_image(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| canonicalize_mime(ct).starts_with("image/"))
}

/// Split a base64 `data:` URL into its canonical mime type and decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), DigestError> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| DigestError::ParseError("Frame is not a data: URL".to_string()))?;

    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DigestError::ParseError("Malformed data: URL".to_string()))?;

    let Some(mime) = meta.strip_suffix(";base64") else {
        return Err(DigestError::ParseError(
            "Only base64 data: URLs are supported".to_string(),
        ));
    };

    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| DigestError::ParseError(format!("Invalid base64 payload: {}", e)))?;

    Ok((canonicalize_mime(mime), bytes))
}
