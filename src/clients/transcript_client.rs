//! YouTube caption retrieval
//!
//! Scrapes the caption track list out of the watch page, then downloads and
//! parses the timed-text XML of the best matching track.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::fetcher::ResourceFetcher;
use crate::errors::DigestError;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

static INNER_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("static regex compile")
});

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Join segment texts into one transcript string.
#[must_use]
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Returns the caption segments for `video_id`, or an error when the video
    /// has no retrievable captions.
    async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, DigestError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "languageCode", default)]
    pub language_code: String,
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn is_english(&self) -> bool {
        self.language_code.to_ascii_lowercase().starts_with("en")
    }
}

pub struct YoutubeTranscriptClient {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl YoutubeTranscriptClient {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    async fn caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, DigestError> {
        let watch_url = Url::parse_with_params(WATCH_URL, &[("v", video_id)])
            .map_err(|e| DigestError::TranscriptError(format!("Invalid video id: {}", e)))?;

        let page = self.fetcher.fetch(watch_url.as_str()).await?;
        if !page.is_success() {
            return Err(DigestError::TranscriptError(format!(
                "Watch page for {} returned HTTP {}",
                video_id, page.status
            )));
        }

        parse_caption_tracks(&page.text())
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptClient {
    async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, DigestError> {
        let tracks = self.caption_tracks(video_id).await?;
        let track = select_track(&tracks).ok_or_else(|| {
            DigestError::TranscriptError(format!("No captions available for video {}", video_id))
        })?;

        debug!(
            "Using caption track lang={} generated={} for {}",
            track.language_code,
            track.is_generated(),
            video_id
        );

        let timed_text = self.fetcher.fetch(&track.base_url).await?;
        if !timed_text.is_success() {
            return Err(DigestError::TranscriptError(format!(
                "Caption track for {} returned HTTP {}",
                video_id, timed_text.status
            )));
        }

        let segments = parse_timed_text(&timed_text.text());
        if segments.is_empty() {
            return Err(DigestError::TranscriptError(format!(
                "Caption track for {} is empty",
                video_id
            )));
        }

        info!("Retrieved {} caption segments for {}", segments.len(), video_id);
        Ok(segments)
    }
}

/// Locate and deserialize the `captionTracks` array embedded in a watch page.
pub fn parse_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, DigestError> {
    let Some(raw) = extract_json_array(html, CAPTION_TRACKS_KEY) else {
        return Err(DigestError::TranscriptError(
            "No captions available for this video".to_string(),
        ));
    };

    serde_json::from_str(raw)
        .map_err(|e| DigestError::TranscriptError(format!("Malformed caption track list: {}", e)))
}

/// Manual English, then generated English, then whatever comes first.
#[must_use]
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.is_english() && !t.is_generated())
        .or_else(|| tracks.iter().find(|t| t.is_english()))
        .or_else(|| tracks.first())
}

/// Returns the balanced `[...]` that follows `key`, honouring JSON strings.
fn extract_json_array<'a>(source: &'a str, key: &str) -> Option<&'a str> {
    let key_pos = source.find(key)?;
    let rest = &source[key_pos + key.len()..];
    let open = rest.find('[')?;
    if !rest[..open].trim().is_empty() {
        return None;
    }

    let body = &rest[open..];
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in body.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&body[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse the `<text>` nodes of a timed-text document into segments.
///
/// Attributes are read by name in any order. Entity references stay raw
/// until [`clean_caption_text`] decodes them, so HTML entities such as
/// `&rsquo;` survive the XML layer.
#[must_use]
pub fn parse_timed_text(xml: &str) -> Vec<TranscriptSegment> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(node)) if node.name().as_ref() == b"text" => {
                let (start, duration) = timing_of(&node);
                current = Some((start, duration, String::new()));
            }
            Ok(Event::Text(text)) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Ok(Event::CData(data)) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::GeneralRef(entity)) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push('&');
                    raw.push_str(&String::from_utf8_lossy(&entity));
                    raw.push(';');
                }
            }
            Ok(Event::End(node)) if node.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let text = clean_caption_text(&raw);
                    if !text.is_empty() {
                        segments.push(TranscriptSegment {
                            text,
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(
                    "Timed text is malformed at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            Ok(_) => {}
        }
    }

    segments
}

fn timing_of(node: &BytesStart<'_>) -> (f64, f64) {
    let mut start = 0.0;
    let mut duration = 0.0;

    for attr in node.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        let parsed = value.trim().parse::<f64>().unwrap_or(0.0);
        match attr.key.as_ref() {
            b"start" => start = parsed,
            b"dur" => duration = parsed,
            _ => {}
        }
    }

    (start, duration)
}

fn clean_caption_text(raw: &str) -> String {
    // Timed text is frequently escaped twice (`&amp;#39;`).
    let once = html_escape::decode_html_entities(raw);
    let twice = html_escape::decode_html_entities(&once);
    let stripped = INNER_TAG_RE.replace_all(&twice, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
