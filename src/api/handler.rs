//! Lambda handler - thin router in front of the analysis pipeline.
//!
//! Routes:
//! - `POST /analyze-page` - full page digest
//! - `POST /summarize` - single-shot text summary
//! - `POST /analyze-video-frames` - captions for captured video frames
//! - `GET /health` - liveness and model readiness
//! - `OPTIONS *` - CORS preflight

use futures::FutureExt;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

use super::{helpers, parsing};
use crate::core::models::{
    AnalysisRequest, FrameAnalysisRequest, SummarizeRequest, SummarizeResponse,
};
use crate::pipeline::{self, DigestPipeline};
use crate::pipeline::chunker::has_readable_text;

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never returns `Err`; every failure is rendered as an HTTP response.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(route(pipeline::shared(), &event.payload).await)
}

/// Dispatch a gateway event to the matching route.
pub async fn route(pipeline: Option<&DigestPipeline>, payload: &Value) -> Value {
    let path = parsing::request_path(payload);
    let method = parsing::request_method(payload);
    info!(method = %method, path = %path, "Request received");

    if method == "OPTIONS" {
        return helpers::preflight();
    }

    if parsing::path_matches(path, "/health") {
        return helpers::ok_json(&json!({
            "status": "ok",
            "models_ready": pipeline.is_some()
        }));
    }

    let known_route = ["/analyze-page", "/summarize", "/analyze-video-frames"]
        .iter()
        .any(|r| parsing::path_matches(path, r));
    if !known_route {
        return helpers::err_response(404, "Not found");
    }

    if method != "POST" {
        return helpers::err_response(405, "Method not allowed");
    }

    let Some(pipeline) = pipeline else {
        error!("Request received before the pipeline finished loading");
        return helpers::err_response(503, "Models are not loaded yet");
    };

    if parsing::path_matches(path, "/analyze-page") {
        handle_analyze_page(pipeline, payload).await
    } else if parsing::path_matches(path, "/summarize") {
        handle_summarize(pipeline, payload).await
    } else {
        handle_video_frames(pipeline, payload).await
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn handle_analyze_page(pipeline: &DigestPipeline, payload: &Value) -> Value {
    let request: AnalysisRequest = match parsing::decode_body(payload)
        .and_then(|body| parsing::parse_json_body(&body))
    {
        Ok(request) => request,
        Err(e) => {
            error!("Error in /analyze-page: {}", e);
            return helpers::ok_error(&e.to_string());
        }
    };

    match AssertUnwindSafe(pipeline.analyze(&request))
        .catch_unwind()
        .await
    {
        Ok(response) => helpers::ok_json(&response),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("Analysis aborted unexpectedly: {}", message);
            helpers::ok_error(&message)
        }
    }
}

async fn handle_summarize(pipeline: &DigestPipeline, payload: &Value) -> Value {
    let request: SummarizeRequest = match parsing::decode_body(payload)
        .and_then(|body| parsing::parse_json_body(&body))
    {
        Ok(request) => request,
        Err(e) => {
            error!("Error in /summarize: {}", e);
            return helpers::ok_error(&e.to_string());
        }
    };

    if !has_readable_text(&request.text) {
        return helpers::ok_error("No text provided");
    }

    match pipeline.summarize_text(&request.text).await {
        Ok(summary) => helpers::ok_json(&SummarizeResponse { summary }),
        Err(e) => {
            warn!("Summarization failed: {}", e);
            helpers::ok_error(&e.to_string())
        }
    }
}

async fn handle_video_frames(pipeline: &DigestPipeline, payload: &Value) -> Value {
    let request: FrameAnalysisRequest = match parsing::decode_body(payload)
        .and_then(|body| parsing::parse_json_body(&body))
    {
        Ok(request) => request,
        Err(e) => {
            error!("Error in /analyze-video-frames: {}", e);
            return helpers::ok_error(&e.to_string());
        }
    };

    match AssertUnwindSafe(pipeline.analyze_frames(&request))
        .catch_unwind()
        .await
    {
        Ok(response) => helpers::ok_json(&response),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("Frame analysis aborted unexpectedly: {}", message);
            helpers::ok_error(&message)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unexpected internal error".to_string()
    }
}
