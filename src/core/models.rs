use serde::{Deserialize, Deserializer, Serialize};

pub const NO_TEXT_PLACEHOLDER: &str = "No readable text found on this page.";
pub const NO_IMAGES_PLACEHOLDER: &str = "No valid images found or could not generate captions.";
pub const NO_VIDEOS_PLACEHOLDER: &str = "No videos found on this page.";
pub const NO_FRAMES_PLACEHOLDER: &str = "Could not analyze any video frames.";

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page snapshot sent by the browser collector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, rename = "images", deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default, rename = "videos", deserialize_with = "null_as_default")]
    pub video_urls: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescription {
    pub url: String,
    pub caption: String,
    pub size: String,
}

impl ImageDescription {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            url: String::new(),
            caption: NO_IMAGES_PLACEHOLDER.to_string(),
            size: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPlatform {
    Youtube,
    Generic,
    Unknown,
    None,
}

impl VideoPlatform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VideoPlatform::Youtube => "youtube",
            VideoPlatform::Generic => "generic",
            VideoPlatform::Unknown => "unknown",
            VideoPlatform::None => "none",
        }
    }
}

/// How a video description was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoMethod {
    Transcript,
    Metadata,
    Detection,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDescription {
    pub url: String,
    #[serde(rename = "type")]
    pub platform: VideoPlatform,
    pub description: String,
    pub method: VideoMethod,
}

impl VideoDescription {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            url: String::new(),
            platform: VideoPlatform::None,
            description: NO_VIDEOS_PLACEHOLDER.to_string(),
            method: VideoMethod::None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisCounts {
    pub images_processed: usize,
    pub images_received: usize,
    pub videos_processed: usize,
    pub videos_received: usize,
    pub text_chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub summaries: Vec<String>,
    pub image_descriptions: Vec<ImageDescription>,
    pub video_descriptions: Vec<VideoDescription>,
    #[serde(rename = "count")]
    pub counts: AnalysisCounts,
}

/// Body returned instead of a response when the request could not be handled at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoFrame {
    /// `data:` URL of the captured frame.
    pub image: String,
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameAnalysisRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub frames: Vec<VideoFrame>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCaption {
    pub timestamp: f64,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysisResponse {
    pub description: String,
    pub captions: Vec<FrameCaption>,
    pub frames_received: usize,
    pub frames_analyzed: usize,
}
