//! Capability interfaces the pipeline consumes.
//!
//! The models behind these traits are opaque: the pipeline only relies on the
//! signatures below and treats every `Err` as a per-item failure.

use async_trait::async_trait;
use image::RgbImage;

use crate::errors::DigestError;

/// Token bounds handed to the summarizer. Decoding is always greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLength {
    pub min_tokens: u32,
    pub max_tokens: u32,
}

impl SummaryLength {
    /// Bounds used for page text chunks.
    pub const PAGE: SummaryLength = SummaryLength {
        min_tokens: 30,
        max_tokens: 130,
    };

    /// Bounds used for video transcripts.
    pub const VIDEO: SummaryLength = SummaryLength {
        min_tokens: 50,
        max_tokens: 150,
    };
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, DigestError>;
}

#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &RgbImage, max_new_tokens: u32) -> Result<String, DigestError>;
}
