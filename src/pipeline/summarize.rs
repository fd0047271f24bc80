//! Text summarization stage

use tracing::{info, warn};

#[cfg(feature = "debug-logs")]
use tracing::debug;

use super::chunker::{chunk_text, has_readable_text};
use crate::ai::{Summarizer, SummaryLength};
use crate::core::models::NO_TEXT_PLACEHOLDER;

/// Result of summarizing one chunk. Failures carry a diagnostic instead of
/// aborting the remaining chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkSummary {
    Summary(String),
    Failed { index: usize, message: String },
}

impl ChunkSummary {
    /// Text shown to the caller; failures render as a diagnostic line.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            ChunkSummary::Summary(text) => text,
            ChunkSummary::Failed { index, message } => {
                format!("Error summarizing chunk {}: {}", index, message)
            }
        }
    }
}

/// Summarize every chunk in order. One result per chunk, always.
pub async fn summarize_chunks(summarizer: &dyn Summarizer, chunks: &[&str]) -> Vec<ChunkSummary> {
    let total = chunks.len();
    let mut results = Vec::with_capacity(total);

    for (offset, chunk) in chunks.iter().enumerate() {
        let index = offset + 1;

        #[cfg(feature = "debug-logs")]
        debug!("Chunk {}/{} text:\n{}", index, total, chunk);

        match summarizer.summarize(chunk, SummaryLength::PAGE).await {
            Ok(summary) => {
                info!("Summarized chunk {}/{}", index, total);
                results.push(ChunkSummary::Summary(summary));
            }
            Err(e) => {
                warn!("Failed to summarize chunk {}/{}: {}", index, total, e);
                results.push(ChunkSummary::Failed {
                    index,
                    message: e.to_string(),
                });
            }
        }
    }

    results
}

/// Chunk and summarize page text, substituting the placeholder when the page
/// has no readable text.
pub async fn summarize_page_text(
    summarizer: &dyn Summarizer,
    text: &str,
    chunk_size: usize,
) -> Vec<String> {
    if !has_readable_text(text) {
        info!("No readable text on page, skipping summarization");
        return vec![NO_TEXT_PLACEHOLDER.to_string()];
    }

    let chunks = chunk_text(text, chunk_size);
    info!("Split {} characters into {} chunks", text.chars().count(), chunks.len());

    summarize_chunks(summarizer, &chunks)
        .await
        .into_iter()
        .map(ChunkSummary::into_text)
        .collect()
}
