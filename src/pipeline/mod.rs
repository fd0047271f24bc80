//! Multi-modal page analysis pipeline
//!
//! A request runs start to finish on one task: text chunks, then images, then
//! videos, each item isolated from the failures of the others.

pub mod aggregate;
pub mod chunker;
pub mod frames;
pub mod images;
pub mod summarize;
pub mod transcript;
pub mod video;
pub mod video_summary;

use anyhow::Context;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::ai::{Captioner, InferenceClient, Summarizer, SummaryLength};
use crate::clients::{HttpFetcher, ResourceFetcher, TranscriptSource, YoutubeTranscriptClient};
use crate::core::config::{AppConfig, PipelineLimits};
use crate::core::models::{AnalysisRequest, AnalysisResponse, FrameAnalysisRequest, FrameAnalysisResponse};
use crate::errors::DigestError;

use self::chunker::{has_readable_text, leading_window};

static SHARED_PIPELINE: OnceCell<DigestPipeline> = OnceCell::new();

/// Install the process-wide pipeline. Must happen before the first request.
///
/// # Errors
///
/// Returns an error if a pipeline was already installed.
pub fn install(pipeline: DigestPipeline) -> Result<&'static DigestPipeline, DigestError> {
    SHARED_PIPELINE
        .set(pipeline)
        .map_err(|_| DigestError::ConfigError("pipeline already initialized".to_string()))?;
    SHARED_PIPELINE
        .get()
        .ok_or_else(|| DigestError::ConfigError("pipeline missing after install".to_string()))
}

/// Build the production pipeline from `config` and install it process-wide.
///
/// # Errors
///
/// Returns an error naming the startup step that failed.
pub fn bootstrap(config: &AppConfig) -> anyhow::Result<&'static DigestPipeline> {
    let pipeline =
        DigestPipeline::from_config(config).context("Failed to build inference and fetch clients")?;
    let installed = install(pipeline).context("Failed to install the shared pipeline")?;

    info!(
        summarizer = %config.summarizer_url,
        captioner = %config.captioner_url,
        "Pipeline ready"
    );
    Ok(installed)
}

/// The process-wide pipeline, if startup has completed.
#[must_use]
pub fn shared() -> Option<&'static DigestPipeline> {
    SHARED_PIPELINE.get()
}

/// Read-only bundle of capability handles plus limits. Shared across requests.
#[derive(Clone)]
pub struct DigestPipeline {
    summarizer: Arc<dyn Summarizer>,
    captioner: Arc<dyn Captioner>,
    fetcher: Arc<dyn ResourceFetcher>,
    transcripts: Arc<dyn TranscriptSource>,
    limits: PipelineLimits,
}

impl std::fmt::Debug for DigestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestPipeline")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl DigestPipeline {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        captioner: Arc<dyn Captioner>,
        fetcher: Arc<dyn ResourceFetcher>,
        transcripts: Arc<dyn TranscriptSource>,
        limits: PipelineLimits,
    ) -> Self {
        Self {
            summarizer,
            captioner,
            fetcher,
            transcripts,
            limits,
        }
    }

    /// Build the production pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, DigestError> {
        let inference = Arc::new(InferenceClient::from_config(config)?);
        let image_fetcher = Arc::new(HttpFetcher::new(
            config.fetch_timeout,
            config.accept_invalid_certs,
        )?);
        let transcript_fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout, false)?);

        Ok(Self::new(
            inference.clone(),
            inference,
            image_fetcher,
            Arc::new(YoutubeTranscriptClient::new(transcript_fetcher)),
            config.limits.clone(),
        ))
    }

    #[must_use]
    pub fn limits(&self) -> &PipelineLimits {
        &self.limits
    }

    /// Analyze a page snapshot. Never fails; per-item problems are absorbed
    /// into placeholders and diagnostics.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResponse {
        let span = info_span!(
            "analyze_page",
            analysis_id = %Uuid::new_v4(),
            page_url = request.url.as_deref().unwrap_or(""),
            page_title = request.title.as_deref().unwrap_or(""),
        );

        async {
            info!(
                "Received {} chars of text, {} image URLs, {} video URLs",
                request.text.chars().count(),
                request.image_urls.len(),
                request.video_urls.len()
            );

            let summaries = summarize::summarize_page_text(
                self.summarizer.as_ref(),
                &request.text,
                self.limits.chunk_size,
            )
            .await;

            let images = images::describe_images(
                self.fetcher.as_ref(),
                self.captioner.as_ref(),
                &request.image_urls,
                &self.limits,
            )
            .await;

            let videos = video_summary::describe_videos(
                self.transcripts.as_ref(),
                self.summarizer.as_ref(),
                &request.video_urls,
                &self.limits,
            )
            .await;

            let response = aggregate::assemble_response(
                summaries,
                images,
                request.image_urls.len(),
                videos,
                request.video_urls.len(),
            );

            info!(
                "Processing complete: {} summaries, {} images, {} videos",
                response.counts.text_chunks,
                response.counts.images_processed,
                response.counts.videos_processed
            );
            response
        }
        .instrument(span)
        .await
    }

    /// Summarize the leading chunk of `text` with page-length bounds.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for blank text and the summarizer's error otherwise.
    pub async fn summarize_text(&self, text: &str) -> Result<String, DigestError> {
        if !has_readable_text(text) {
            return Err(DigestError::ParseError("No text provided".to_string()));
        }
        let window = leading_window(text, self.limits.chunk_size);
        self.summarizer.summarize(window, SummaryLength::PAGE).await
    }

    /// Caption frames captured from a playing video.
    pub async fn analyze_frames(&self, request: &FrameAnalysisRequest) -> FrameAnalysisResponse {
        let span = info_span!(
            "analyze_frames",
            analysis_id = %Uuid::new_v4(),
            frames = request.frames.len(),
        );

        frames::analyze_frames(self.captioner.as_ref(), request, &self.limits)
            .instrument(span)
            .await
    }
}
