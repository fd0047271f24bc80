//! Client modules for external resource access

pub mod fetcher;
pub mod transcript_client;

pub use fetcher::{FetchedResource, HttpFetcher, ResourceFetcher};
pub use transcript_client::{TranscriptSegment, TranscriptSource, YoutubeTranscriptClient};
