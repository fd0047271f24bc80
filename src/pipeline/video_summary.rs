//! Video description stage: transcript summarization plus the metadata and
//! detection fallbacks.

use tracing::{info, warn};

use super::chunker::leading_window;
use super::transcript::{TranscriptOutcome, retrieve_transcript};
use super::video::{VideoCandidate, classify_video};
use crate::ai::{Summarizer, SummaryLength};
use crate::clients::TranscriptSource;
use crate::core::config::PipelineLimits;
use crate::core::models::{VideoDescription, VideoMethod, VideoPlatform};
use crate::utils::links::truncate_for_log;

#[must_use]
pub fn transcript_unavailable_description(video_id: &str) -> String {
    format!(
        "YouTube video (ID: {}). No transcript is available for this video.",
        video_id
    )
}

#[must_use]
pub fn summarization_failed_description(video_id: &str) -> String {
    format!(
        "YouTube video (ID: {}). A transcript was found but summarization failed.",
        video_id
    )
}

#[must_use]
pub fn detection_description(platform: VideoPlatform) -> String {
    match platform {
        VideoPlatform::Unknown => {
            "Video detected, but its URL could not be recognized.".to_string()
        }
        _ => "Video detected. Automatic descriptions are only available for YouTube videos."
            .to_string(),
    }
}

/// Summarize the leading window of a transcript with the video length bounds.
pub async fn summarize_transcript(
    summarizer: &dyn Summarizer,
    candidate: &VideoCandidate,
    video_id: &str,
    transcript: &str,
    window: usize,
) -> VideoDescription {
    let excerpt = leading_window(transcript, window);

    match summarizer.summarize(excerpt, SummaryLength::VIDEO).await {
        Ok(summary) => VideoDescription {
            url: candidate.url.clone(),
            platform: candidate.platform,
            description: summary,
            method: VideoMethod::Transcript,
        },
        Err(e) => {
            warn!("Failed to summarize transcript for {}: {}", video_id, e);
            VideoDescription {
                url: candidate.url.clone(),
                platform: candidate.platform,
                description: summarization_failed_description(video_id),
                method: VideoMethod::Metadata,
            }
        }
    }
}

/// Produce exactly one description for a classified video.
pub async fn describe_video(
    transcripts: &dyn TranscriptSource,
    summarizer: &dyn Summarizer,
    candidate: &VideoCandidate,
    limits: &PipelineLimits,
) -> VideoDescription {
    let video_id = match (candidate.platform, candidate.platform_id.as_deref()) {
        (VideoPlatform::Youtube, Some(id)) => id,
        _ => {
            return VideoDescription {
                url: candidate.url.clone(),
                platform: candidate.platform,
                description: detection_description(candidate.platform),
                method: VideoMethod::Detection,
            };
        }
    };

    match retrieve_transcript(transcripts, video_id, limits.transcript_min_chars).await {
        TranscriptOutcome::Found(transcript) => {
            summarize_transcript(
                summarizer,
                candidate,
                video_id,
                &transcript,
                limits.transcript_window,
            )
            .await
        }
        TranscriptOutcome::Unavailable(_) => VideoDescription {
            url: candidate.url.clone(),
            platform: candidate.platform,
            description: transcript_unavailable_description(video_id),
            method: VideoMethod::Metadata,
        },
    }
}

/// Describe videos in order, stopping once `limits.max_videos` are done.
pub async fn describe_videos(
    transcripts: &dyn TranscriptSource,
    summarizer: &dyn Summarizer,
    urls: &[String],
    limits: &PipelineLimits,
) -> Vec<VideoDescription> {
    let mut descriptions = Vec::new();

    for (offset, url) in urls.iter().enumerate() {
        if descriptions.len() >= limits.max_videos {
            info!(
                "Video quota of {} reached, {} URLs left unprocessed",
                limits.max_videos,
                urls.len() - offset
            );
            break;
        }

        let candidate = classify_video(url);
        info!(
            "Processing video {} ({}): {}",
            offset + 1,
            candidate.platform.as_str(),
            truncate_for_log(url)
        );

        let description = describe_video(transcripts, summarizer, &candidate, limits).await;
        info!(
            "Video {} described via {:?}",
            offset + 1,
            description.method
        );
        descriptions.push(description);
    }

    descriptions
}
