//! Inference capabilities (summarization, captioning)

pub mod capabilities;
pub mod client;

// Re-export main types for convenience
pub use capabilities::{Captioner, Summarizer, SummaryLength};
pub use client::InferenceClient;
