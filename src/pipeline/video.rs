//! Video URL classification

use url::Url;

use crate::core::models::VideoPlatform;
use crate::utils::links::host_of;

const LONG_FORM_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

/// Path prefixes on long-form hosts whose next segment is the video id.
const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "live", "v"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub url: String,
    pub platform: VideoPlatform,
    pub platform_id: Option<String>,
}

/// Classify a video URL. Never fails: unparseable input is `Unknown`, and a
/// recognized host without an identifier is `Generic`.
#[must_use]
pub fn classify_video(raw: &str) -> VideoCandidate {
    let Ok(url) = Url::parse(raw.trim()) else {
        return VideoCandidate {
            url: raw.to_string(),
            platform: VideoPlatform::Unknown,
            platform_id: None,
        };
    };

    match youtube_id(&url) {
        Some(id) => VideoCandidate {
            url: raw.to_string(),
            platform: VideoPlatform::Youtube,
            platform_id: Some(id),
        },
        None => VideoCandidate {
            url: raw.to_string(),
            platform: VideoPlatform::Generic,
            platform_id: None,
        },
    }
}

fn youtube_id(url: &Url) -> Option<String> {
    let host = host_of(url)?;

    let id = if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        Some(url.path().trim_matches('/').to_string())
    } else if LONG_FORM_HOSTS.contains(&host.as_str()) {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .or_else(|| id_from_path(url))
    } else {
        None
    };

    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

fn id_from_path(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    let prefix = segments.next()?;
    if !ID_PATH_PREFIXES.contains(&prefix) {
        return None;
    }
    segments.next().map(str::to_string)
}
