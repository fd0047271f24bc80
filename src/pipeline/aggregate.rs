//! Response assembly

use super::images::ImageStageReport;
use crate::core::models::{AnalysisCounts, AnalysisResponse, ImageDescription, VideoDescription};

/// Combine stage outputs into the response, filling empty categories with
/// their placeholder. Counts reflect real work only.
#[must_use]
pub fn assemble_response(
    summaries: Vec<String>,
    images: ImageStageReport,
    images_received: usize,
    videos: Vec<VideoDescription>,
    videos_received: usize,
) -> AnalysisResponse {
    let counts = AnalysisCounts {
        images_processed: images.processed(),
        images_received,
        videos_processed: videos.len(),
        videos_received,
        text_chunks: summaries.len(),
    };

    let image_descriptions = if images.descriptions.is_empty() {
        vec![ImageDescription::placeholder()]
    } else {
        images.descriptions
    };

    let video_descriptions = if videos.is_empty() {
        vec![VideoDescription::placeholder()]
    } else {
        videos
    };

    AnalysisResponse {
        summaries,
        image_descriptions,
        video_descriptions,
        counts,
    }
}
