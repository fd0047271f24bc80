//! Image resolution and captioning stages
//!
//! Every URL is handled in isolation: whatever goes wrong for one image is
//! recorded as a [`SkipReason`] and the loop moves on.

use image::RgbImage;
use std::fmt;
use tracing::{info, warn};

use crate::ai::Captioner;
use crate::clients::ResourceFetcher;
use crate::core::config::PipelineLimits;
use crate::core::models::ImageDescription;
use crate::utils::filters::{is_content_sized, usable_caption};
use crate::utils::links::{is_http_url, truncate_for_log};
use crate::utils::mime::declares_image;

/// A decoded image waiting for a caption. Dropped right after captioning.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub url: String,
    pub image: RgbImage,
}

impl ImageCandidate {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.width(), self.height())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotHttp,
    HttpStatus(u16),
    Network(String),
    Decode(String),
    TooSmall { width: u32, height: u32 },
    CaptionFailed(String),
    EmptyCaption,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotHttp => write!(f, "not an HTTP(S) URL"),
            SkipReason::HttpStatus(status) => write!(f, "HTTP status {}", status),
            SkipReason::Network(msg) => write!(f, "request error: {}", msg),
            SkipReason::Decode(msg) => write!(f, "cannot identify image format: {}", msg),
            SkipReason::TooSmall { width, height } => {
                write!(f, "image too small ({}x{})", width, height)
            }
            SkipReason::CaptionFailed(msg) => write!(f, "caption generation failed: {}", msg),
            SkipReason::EmptyCaption => write!(f, "caption generation returned nothing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Described(ImageDescription),
    Skipped { url: String, reason: SkipReason },
}

/// What the image stage produced for one request.
#[derive(Debug, Clone, Default)]
pub struct ImageStageReport {
    pub descriptions: Vec<ImageDescription>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl ImageStageReport {
    #[must_use]
    pub fn processed(&self) -> usize {
        self.descriptions.len()
    }

    fn record(&mut self, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::Described(description) => self.descriptions.push(description),
            ImageOutcome::Skipped { url, reason } => self.skipped.push((url, reason)),
        }
    }
}

/// Decode raw bytes whatever their declared type, normalize to RGB and apply
/// the minimum-size filter.
pub fn decode_candidate(url: &str, bytes: &[u8], min_side: u32) -> Result<ImageCandidate, SkipReason> {
    let decoded = image::load_from_memory(bytes).map_err(|e| SkipReason::Decode(e.to_string()))?;
    let image = decoded.to_rgb8();

    let (width, height) = image.dimensions();
    if !is_content_sized(width, height, min_side) {
        return Err(SkipReason::TooSmall { width, height });
    }

    Ok(ImageCandidate {
        url: url.to_string(),
        image,
    })
}

/// Validate, download and decode one image URL.
pub async fn resolve_image(
    fetcher: &dyn ResourceFetcher,
    url: &str,
    min_side: u32,
) -> Result<ImageCandidate, SkipReason> {
    if !is_http_url(url) {
        return Err(SkipReason::NotHttp);
    }

    let resource = fetcher
        .fetch(url)
        .await
        .map_err(|e| SkipReason::Network(e.to_string()))?;

    if !resource.is_success() {
        return Err(SkipReason::HttpStatus(resource.status));
    }

    if !declares_image(resource.content_type.as_deref()) {
        info!(
            "Content-Type {:?} does not claim an image, decoding anyway",
            resource.content_type
        );
    }

    let candidate = decode_candidate(url, &resource.bytes, min_side)?;
    info!("Image size: {}", candidate.size_label());
    Ok(candidate)
}

/// Caption a resolved candidate, consuming it.
pub async fn caption_candidate(
    captioner: &dyn Captioner,
    candidate: ImageCandidate,
    max_new_tokens: u32,
) -> Result<ImageDescription, SkipReason> {
    let raw = captioner
        .caption(&candidate.image, max_new_tokens)
        .await
        .map_err(|e| SkipReason::CaptionFailed(e.to_string()))?;

    let caption = usable_caption(&raw).ok_or(SkipReason::EmptyCaption)?;
    let size = candidate.size_label();

    Ok(ImageDescription {
        url: candidate.url,
        caption,
        size,
    })
}

async fn describe_image(
    fetcher: &dyn ResourceFetcher,
    captioner: &dyn Captioner,
    url: &str,
    limits: &PipelineLimits,
) -> ImageOutcome {
    let described = match resolve_image(fetcher, url, limits.min_image_side).await {
        Ok(candidate) => caption_candidate(captioner, candidate, limits.caption_max_tokens).await,
        Err(reason) => Err(reason),
    };

    match described {
        Ok(description) => ImageOutcome::Described(description),
        Err(reason) => ImageOutcome::Skipped {
            url: url.to_string(),
            reason,
        },
    }
}

/// Caption images in order until `limits.max_images` have succeeded.
pub async fn describe_images(
    fetcher: &dyn ResourceFetcher,
    captioner: &dyn Captioner,
    urls: &[String],
    limits: &PipelineLimits,
) -> ImageStageReport {
    let mut report = ImageStageReport::default();

    for (offset, url) in urls.iter().enumerate() {
        if report.processed() >= limits.max_images {
            info!(
                "Image quota of {} reached, {} URLs left unprocessed",
                limits.max_images,
                urls.len() - offset
            );
            break;
        }

        info!("Processing image {}: {}", offset + 1, truncate_for_log(url));
        let outcome = describe_image(fetcher, captioner, url, limits).await;

        match &outcome {
            ImageOutcome::Described(description) => {
                info!("Caption: {}", truncate_for_log(&description.caption));
            }
            ImageOutcome::Skipped { reason, .. } => {
                warn!("Skipping image {}: {}", offset + 1, reason);
            }
        }

        report.record(outcome);
    }

    info!(
        "Image stage complete: {} described, {} skipped",
        report.processed(),
        report.skipped.len()
    );
    report
}
