use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::DigestError;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 120;

/// Fixed knobs of the analysis pipeline.
///
/// `Default` reproduces the production constants; only the per-request caps
/// are overridable from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineLimits {
    pub chunk_size: usize,
    pub max_images: usize,
    pub max_videos: usize,
    pub max_frames: usize,
    pub min_image_side: u32,
    pub caption_max_tokens: u32,
    pub transcript_min_chars: usize,
    pub transcript_window: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            max_images: 5,
            max_videos: 3,
            max_frames: 5,
            min_image_side: 50,
            caption_max_tokens: 50,
            transcript_min_chars: 50,
            transcript_window: 2000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub summarizer_url: String,
    pub captioner_url: String,
    pub inference_api_token: Option<String>,
    pub accept_invalid_certs: bool,
    pub fetch_timeout: Duration,
    pub inference_timeout: Duration,
    pub limits: PipelineLimits,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DigestError> {
        let defaults = PipelineLimits::default();
        let limits = PipelineLimits {
            max_images: parse_var("MAX_IMAGES", defaults.max_images)?,
            max_videos: parse_var("MAX_VIDEOS", defaults.max_videos)?,
            max_frames: parse_var("MAX_FRAMES", defaults.max_frames)?,
            ..defaults
        };

        Ok(Self {
            summarizer_url: required_var("SUMMARIZER_URL")?,
            captioner_url: required_var("CAPTIONER_URL")?,
            inference_api_token: env::var("INFERENCE_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            accept_invalid_certs: parse_bool_var("ACCEPT_INVALID_CERTS")?,
            fetch_timeout: Duration::from_secs(parse_var(
                "FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            inference_timeout: Duration::from_secs(parse_var(
                "INFERENCE_TIMEOUT_SECS",
                DEFAULT_INFERENCE_TIMEOUT_SECS,
            )?),
            limits,
        })
    }
}

fn required_var(name: &str) -> Result<String, DigestError> {
    require_value(name, env::var(name).ok())
}

fn require_value(name: &str, value: Option<String>) -> Result<String, DigestError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        Some(_) => Err(DigestError::ConfigError(format!("{}: must not be blank", name))),
        None => Err(DigestError::ConfigError(format!("{}: not set", name))),
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, DigestError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DigestError::ConfigError(format!("{}: invalid value '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

fn parse_bool_var(name: &str) -> Result<bool, DigestError> {
    let Ok(raw) = env::var(name) else {
        return Ok(false);
    };
    parse_bool(&raw)
        .ok_or_else(|| DigestError::ConfigError(format!("{}: invalid value '{}'", name, raw)))
}

#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
