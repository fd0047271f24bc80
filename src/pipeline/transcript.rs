//! Transcript retrieval stage

use tracing::{info, warn};

use crate::clients::TranscriptSource;
use crate::clients::transcript_client::join_segments;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// Usable transcript text.
    Found(String),
    /// No usable transcript; the payload says why.
    Unavailable(String),
}

/// Fetch the transcript for `video_id`. Transcripts whose trimmed length does
/// not exceed `min_chars` count as unavailable.
pub async fn retrieve_transcript(
    source: &dyn TranscriptSource,
    video_id: &str,
    min_chars: usize,
) -> TranscriptOutcome {
    let segments = match source.transcript(video_id).await {
        Ok(segments) => segments,
        Err(e) => {
            warn!("Transcript unavailable for {}: {}", video_id, e);
            return TranscriptOutcome::Unavailable(e.to_string());
        }
    };

    let text = join_segments(&segments);
    let length = text.trim().chars().count();
    if length <= min_chars {
        info!("Transcript for {} too short ({} chars)", video_id, length);
        return TranscriptOutcome::Unavailable(format!("transcript too short ({} chars)", length));
    }

    info!("Transcript for {} has {} chars", video_id, length);
    TranscriptOutcome::Found(text)
}
