//! Inference endpoint client
//!
//! Talks to Hugging Face-compatible inference endpoints hosting the
//! summarization and image-to-text models.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbImage};
use reqwest::Client;
use serde_json::{Value, json};
use std::io::Cursor;
use std::time::Duration;
use tracing::info;

#[cfg(feature = "debug-logs")]
use tracing::debug;

use super::capabilities::{Captioner, Summarizer, SummaryLength};
use crate::core::config::AppConfig;
use crate::errors::DigestError;

/// HTTP client for the hosted summarizer and captioner models
pub struct InferenceClient {
    http: Client,
    summarizer_url: String,
    captioner_url: String,
    api_token: Option<String>,
}

impl InferenceClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        summarizer_url: String,
        captioner_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DigestError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            summarizer_url,
            captioner_url,
            api_token,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, DigestError> {
        Self::new(
            config.summarizer_url.clone(),
            config.captioner_url.clone(),
            config.inference_api_token.clone(),
            config.inference_timeout,
        )
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, DigestError> {
        let mut request = self.http.post(url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DigestError::HttpError(format!("Inference request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DigestError::InferenceError(format!(
                "Endpoint returned {}: {}",
                status, error_text
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            DigestError::InferenceError(format!("Failed to parse inference response: {}", e))
        })?;

        #[cfg(feature = "debug-logs")]
        debug!("Inference response from {}: {}", url, payload);

        Ok(payload)
    }
}

/// Pull `field` out of either `[{field: ..}]` or `{field: ..}`.
///
/// Endpoints report model-side failures as `{"error": ".."}` with a 200, so
/// that shape is turned into an error too.
pub fn extract_generated_text(payload: &Value, field: &str) -> Result<String, DigestError> {
    if let Some(message) = payload.get("error").and_then(Value::as_str) {
        return Err(DigestError::InferenceError(message.to_string()));
    }

    let item = match payload {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(payload),
        _ => None,
    };

    item.and_then(|v| v.get(field))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            DigestError::InferenceError(format!("No '{}' in inference response", field))
        })
}

/// PNG-encode and base64 an RGB image for a JSON request body.
pub fn encode_image_payload(image: &RgbImage) -> Result<String, DigestError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(general_purpose::STANDARD.encode(buffer.into_inner()))
}

#[async_trait]
impl Summarizer for InferenceClient {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, DigestError> {
        info!(
            "Summarizing {} characters (min_length={}, max_length={})",
            text.chars().count(),
            length.min_tokens,
            length.max_tokens
        );

        let body = json!({
            "inputs": text,
            "parameters": {
                "min_length": length.min_tokens,
                "max_length": length.max_tokens,
                "do_sample": false
            }
        });

        let payload = self.post(&self.summarizer_url, &body).await?;
        extract_generated_text(&payload, "summary_text")
    }
}

#[async_trait]
impl Captioner for InferenceClient {
    async fn caption(&self, image: &RgbImage, max_new_tokens: u32) -> Result<String, DigestError> {
        let body = json!({
            "inputs": encode_image_payload(image)?,
            "parameters": {
                "max_new_tokens": max_new_tokens,
                "do_sample": false
            }
        });

        let payload = self.post(&self.captioner_url, &body).await?;
        extract_generated_text(&payload, "generated_text")
    }
}
