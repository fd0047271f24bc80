#![allow(dead_code)]

use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use pagedigest::ai::{Captioner, Summarizer, SummaryLength};
use pagedigest::clients::{FetchedResource, ResourceFetcher, TranscriptSegment, TranscriptSource};
use pagedigest::core::config::PipelineLimits;
use pagedigest::errors::DigestError;
use pagedigest::pipeline::DigestPipeline;

/// Summarizer that echoes a numbered summary and records every call.
#[derive(Default)]
pub struct FakeSummarizer {
    pub calls: Mutex<Vec<(String, SummaryLength)>>,
    /// 1-based call numbers that should fail.
    pub fail_on: Vec<usize>,
}

impl FakeSummarizer {
    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn lengths(&self) -> Vec<SummaryLength> {
        self.calls.lock().unwrap().iter().map(|(_, l)| *l).collect()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, DigestError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), length));
            calls.len()
        };
        if self.fail_on.contains(&call) {
            return Err(DigestError::InferenceError("model overloaded".to_string()));
        }
        Ok(format!("summary #{} of {} chars", call, text.chars().count()))
    }
}

/// Captioner that describes the image by its size, or fails for given widths.
#[derive(Default)]
pub struct FakeCaptioner {
    pub fail_widths: Vec<u32>,
    pub blank_widths: Vec<u32>,
    pub calls: Mutex<Vec<u32>>,
}

#[async_trait]
impl Captioner for FakeCaptioner {
    async fn caption(&self, image: &RgbImage, _max_new_tokens: u32) -> Result<String, DigestError> {
        let width = image.width();
        self.calls.lock().unwrap().push(width);
        if self.fail_widths.contains(&width) {
            return Err(DigestError::InferenceError("caption model crashed".to_string()));
        }
        if self.blank_widths.contains(&width) {
            return Ok("   ".to_string());
        }
        Ok(format!("a picture {} pixels wide", width))
    }
}

/// Fetcher backed by a URL map; unknown URLs fail like a DNS error.
#[derive(Default)]
pub struct FakeFetcher {
    pub responses: HashMap<String, FetchedResource>,
    pub requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn with(mut self, url: &str, status: u16, bytes: Vec<u8>, content_type: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchedResource {
                status,
                bytes,
                content_type: Some(content_type.to_string()),
            },
        );
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, DigestError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| DigestError::HttpError(format!("dns error: {}", url)))
    }
}

/// Transcript source backed by an id map; unknown ids have no captions.
#[derive(Default)]
pub struct FakeTranscripts {
    pub transcripts: HashMap<String, String>,
}

impl FakeTranscripts {
    pub fn with(mut self, id: &str, text: &str) -> Self {
        self.transcripts.insert(id.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, DigestError> {
        let text = self.transcripts.get(video_id).ok_or_else(|| {
            DigestError::TranscriptError(format!("No captions available for video {}", video_id))
        })?;
        Ok(text
            .split(". ")
            .enumerate()
            .map(|(i, part)| TranscriptSegment {
                text: part.to_string(),
                start: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub struct Harness {
    pub summarizer: Arc<FakeSummarizer>,
    pub captioner: Arc<FakeCaptioner>,
    pub fetcher: Arc<FakeFetcher>,
    pub transcripts: Arc<FakeTranscripts>,
}

impl Harness {
    pub fn new(
        summarizer: FakeSummarizer,
        captioner: FakeCaptioner,
        fetcher: FakeFetcher,
        transcripts: FakeTranscripts,
    ) -> Self {
        Self {
            summarizer: Arc::new(summarizer),
            captioner: Arc::new(captioner),
            fetcher: Arc::new(fetcher),
            transcripts: Arc::new(transcripts),
        }
    }

    pub fn pipeline(&self) -> DigestPipeline {
        DigestPipeline::new(
            self.summarizer.clone(),
            self.captioner.clone(),
            self.fetcher.clone(),
            self.transcripts.clone(),
            PipelineLimits::default(),
        )
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(
            FakeSummarizer::default(),
            FakeCaptioner::default(),
            FakeFetcher::default(),
            FakeTranscripts::default(),
        )
    }
}
