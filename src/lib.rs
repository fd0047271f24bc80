//! pagedigest - turns a snapshot of a web page into a readable digest.
//!
//! A browser-side collector posts the page's extracted text, image URLs and
//! video URLs; this crate answers with text summaries, image captions and
//! video descriptions.
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda (behind a function URL or HTTP API) for hosting
//! - Hugging Face-compatible inference endpoints for summarization and captioning
//! - reqwest for fetching page assets and caption tracks
//! - the `image` crate for decoding whatever the page served
//! - Tokio for async runtime
//!
//! Each request runs through the [`pipeline::DigestPipeline`] sequentially:
//! text chunks, then images, then videos. A failure on one item never aborts
//! the others, and the response always has at least one entry per category.
//!
//! # Example
//!
//! ```no_run
//! use pagedigest::core::config::AppConfig;
//! use pagedigest::core::models::AnalysisRequest;
//! use pagedigest::pipeline::DigestPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     pagedigest::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let pipeline = DigestPipeline::from_config(&config)?;
//!
//!     let request = AnalysisRequest {
//!         text: "Rust is a systems programming language...".to_string(),
//!         image_urls: vec!["https://example.com/diagram.png".to_string()],
//!         video_urls: vec!["https://youtu.be/dQw4w9WgXcQ".to_string()],
//!         ..AnalysisRequest::default()
//!     };
//!
//!     let response = pipeline.analyze(&request).await;
//!     for summary in &response.summaries {
//!         println!("Summary: {}", summary);
//!     }
//!     Ok(())
//! }
//! ```
// Module declarations
pub mod ai;
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod pipeline;
pub mod utils;

pub use errors::DigestError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level defaults to `info` and can be
/// overridden with `RUST_LOG`. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// pagedigest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
