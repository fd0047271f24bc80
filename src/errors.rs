use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Inference capability failed: {0}")]
    InferenceError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to retrieve transcript: {0}")]
    TranscriptError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        DigestError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(error: serde_json::Error) -> Self {
        DigestError::ParseError(error.to_string())
    }
}

impl From<image::ImageError> for DigestError {
    fn from(error: image::ImageError) -> Self {
        DigestError::DecodeError(error.to_string())
    }
}
