//! Captioning of frames captured client-side from a playing video

use tracing::{info, warn};

use super::images::{SkipReason, caption_candidate, decode_candidate};
use crate::ai::Captioner;
use crate::core::config::PipelineLimits;
use crate::core::models::{
    FrameAnalysisRequest, FrameAnalysisResponse, FrameCaption, NO_FRAMES_PLACEHOLDER, VideoFrame,
};
use crate::utils::mime::decode_data_url;

async fn caption_frame(
    captioner: &dyn Captioner,
    frame: &VideoFrame,
    limits: &PipelineLimits,
) -> Result<String, SkipReason> {
    let (_mime, bytes) =
        decode_data_url(&frame.image).map_err(|e| SkipReason::Decode(e.to_string()))?;
    let label = format!("frame@{:.1}s", frame.timestamp);
    let candidate = decode_candidate(&label, &bytes, limits.min_image_side)?;
    let description = caption_candidate(captioner, candidate, limits.caption_max_tokens).await?;
    Ok(description.caption)
}

/// Render captions as one line per distinct caption.
#[must_use]
pub fn describe_captions(captions: &[FrameCaption]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for c in captions {
        if seen.contains(&c.caption.as_str()) {
            continue;
        }
        seen.push(&c.caption);
        lines.push(format!("At {:.1}s: {}", c.timestamp, c.caption));
    }

    if lines.is_empty() {
        NO_FRAMES_PLACEHOLDER.to_string()
    } else {
        lines.join("\n")
    }
}

/// Caption up to `limits.max_frames` frames in order, isolating failures.
pub async fn analyze_frames(
    captioner: &dyn Captioner,
    request: &FrameAnalysisRequest,
    limits: &PipelineLimits,
) -> FrameAnalysisResponse {
    let mut captions = Vec::new();

    for (offset, frame) in request.frames.iter().take(limits.max_frames).enumerate() {
        match caption_frame(captioner, frame, limits).await {
            Ok(caption) => {
                info!("Frame {} at {:.1}s: {}", offset + 1, frame.timestamp, caption);
                captions.push(FrameCaption {
                    timestamp: frame.timestamp,
                    caption,
                });
            }
            Err(reason) => warn!("Skipping frame {}: {}", offset + 1, reason),
        }
    }

    FrameAnalysisResponse {
        description: describe_captions(&captions),
        frames_received: request.frames.len(),
        frames_analyzed: captions.len(),
        captions,
    }
}
