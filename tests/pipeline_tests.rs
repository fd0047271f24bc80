mod common;

use common::{FakeCaptioner, FakeFetcher, FakeSummarizer, FakeTranscripts, Harness, png_bytes};
use pagedigest::ai::SummaryLength;
use pagedigest::core::models::{
    AnalysisRequest, NO_IMAGES_PLACEHOLDER, NO_TEXT_PLACEHOLDER, NO_VIDEOS_PLACEHOLDER,
    VideoMethod, VideoPlatform,
};

const LONG_TRANSCRIPT: &str = "Welcome to the channel. Today we look at ownership in Rust. \
    Borrowing lets you reference data without taking ownership. Lifetimes keep references valid";

fn request(text: &str, images: &[&str], videos: &[&str]) -> AnalysisRequest {
    AnalysisRequest {
        text: text.to_string(),
        image_urls: images.iter().map(|s| (*s).to_string()).collect(),
        video_urls: videos.iter().map(|s| (*s).to_string()).collect(),
        ..AnalysisRequest::default()
    }
}

#[tokio::test]
async fn empty_request_yields_placeholders_everywhere() {
    let harness = Harness::default();
    let response = harness.pipeline().analyze(&request("", &[], &[])).await;

    assert_eq!(response.summaries, vec![NO_TEXT_PLACEHOLDER.to_string()]);
    assert_eq!(response.image_descriptions.len(), 1);
    assert_eq!(response.image_descriptions[0].caption, NO_IMAGES_PLACEHOLDER);
    assert_eq!(response.image_descriptions[0].url, "");
    assert_eq!(response.image_descriptions[0].size, "");
    assert_eq!(response.video_descriptions.len(), 1);
    assert_eq!(response.video_descriptions[0].description, NO_VIDEOS_PLACEHOLDER);
    assert_eq!(response.video_descriptions[0].url, "");
    assert_eq!(response.video_descriptions[0].platform, VideoPlatform::None);

    assert_eq!(response.counts.images_processed, 0);
    assert_eq!(response.counts.images_received, 0);
    assert_eq!(response.counts.videos_processed, 0);
    assert_eq!(response.counts.videos_received, 0);
    assert_eq!(response.counts.text_chunks, 1);
    assert_eq!(harness.summarizer.call_count(), 0);
}

#[tokio::test]
async fn whitespace_text_skips_summarization() {
    let harness = Harness::default();
    let response = harness.pipeline().analyze(&request("  \n\t ", &[], &[])).await;
    assert_eq!(response.summaries, vec![NO_TEXT_PLACEHOLDER.to_string()]);
    assert_eq!(harness.summarizer.call_count(), 0);
}

#[tokio::test]
async fn long_text_is_summarized_chunk_by_chunk_in_order() {
    let harness = Harness::default();
    let text = format!("{}{}{}", "a".repeat(2000), "b".repeat(2000), "c".repeat(500));
    let response = harness.pipeline().analyze(&request(&text, &[], &[])).await;

    assert_eq!(response.summaries.len(), 3);
    assert_eq!(response.counts.text_chunks, 3);
    assert_eq!(response.summaries[0], "summary #1 of 2000 chars");
    assert_eq!(response.summaries[2], "summary #3 of 500 chars");

    let inputs = harness.summarizer.inputs();
    assert_eq!(inputs, vec!["a".repeat(2000), "b".repeat(2000), "c".repeat(500)]);
    assert!(
        harness
            .summarizer
            .lengths()
            .iter()
            .all(|l| *l == SummaryLength::PAGE)
    );
}

#[tokio::test]
async fn failed_chunk_becomes_diagnostic_without_aborting_the_rest() {
    let harness = Harness::new(
        FakeSummarizer::failing_on(vec![2]),
        FakeCaptioner::default(),
        FakeFetcher::default(),
        FakeTranscripts::default(),
    );
    let text = "z".repeat(5000);
    let response = harness.pipeline().analyze(&request(&text, &[], &[])).await;

    assert_eq!(response.summaries.len(), 3);
    assert_eq!(response.summaries[0], "summary #1 of 2000 chars");
    assert!(response.summaries[1].starts_with("Error summarizing chunk 2:"));
    assert!(response.summaries[1].contains("model overloaded"));
    assert_eq!(response.summaries[2], "summary #3 of 1000 chars");
}

#[tokio::test]
async fn image_returning_404_is_skipped_and_placeholder_used() {
    let url = "https://example.com/missing.png";
    let harness = Harness::new(
        FakeSummarizer::default(),
        FakeCaptioner::default(),
        FakeFetcher::default().with(url, 404, b"not found".to_vec(), "text/html"),
        FakeTranscripts::default(),
    );
    let response = harness.pipeline().analyze(&request("", &[url], &[])).await;

    assert_eq!(response.counts.images_processed, 0);
    assert_eq!(response.counts.images_received, 1);
    assert_eq!(response.image_descriptions.len(), 1);
    assert_eq!(response.image_descriptions[0].caption, NO_IMAGES_PLACEHOLDER);
    assert!(harness.captioner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn image_filters_are_applied_per_item() {
    let good = "https://example.com/photo.png";
    let mislabeled = "https://example.com/photo-served-as-text";
    let tiny = "https://example.com/pixel.png";
    let garbage = "https://example.com/not-an-image.png";
    let unreachable = "https://unreachable.example/a.png";

    let harness = Harness::new(
        FakeSummarizer::default(),
        FakeCaptioner::default(),
        FakeFetcher::default()
            .with(good, 200, png_bytes(120, 80), "image/png")
            .with(mislabeled, 200, png_bytes(64, 64), "text/plain")
            .with(tiny, 200, png_bytes(1, 1), "image/png")
            .with(garbage, 200, b"<html>oops</html>".to_vec(), "image/png"),
        FakeTranscripts::default(),
    );

    let urls = [
        "data:image/png;base64,AAAA",
        "/relative/path.png",
        good,
        tiny,
        garbage,
        unreachable,
        mislabeled,
    ];
    let response = harness.pipeline().analyze(&request("", &urls, &[])).await;

    assert_eq!(response.counts.images_received, 7);
    assert_eq!(response.counts.images_processed, 2);
    assert_eq!(response.image_descriptions.len(), 2);

    assert_eq!(response.image_descriptions[0].url, good);
    assert_eq!(response.image_descriptions[0].size, "120x80");
    assert_eq!(response.image_descriptions[0].caption, "a picture 120 pixels wide");
    assert_eq!(response.image_descriptions[1].url, mislabeled);
    assert_eq!(response.image_descriptions[1].size, "64x64");

    // Non-HTTP URLs are never fetched.
    let requested = harness.fetcher.requested();
    assert!(!requested.iter().any(|u| u.starts_with("data:")));
    assert!(!requested.iter().any(|u| u.starts_with('/')));
}

#[tokio::test]
async fn caption_failures_do_not_count_toward_quota() {
    let mut fetcher = FakeFetcher::default();
    let mut urls = Vec::new();
    // Widths 100..=107; the first two fail captioning, the third is blank.
    for i in 0..8u32 {
        let url = format!("https://img.example.com/{}.png", i);
        fetcher = fetcher.with(&url, 200, png_bytes(100 + i, 100), "image/png");
        urls.push(url);
    }
    let captioner = FakeCaptioner {
        fail_widths: vec![100, 101],
        blank_widths: vec![102],
        ..FakeCaptioner::default()
    };
    let harness = Harness::new(
        FakeSummarizer::default(),
        captioner,
        fetcher,
        FakeTranscripts::default(),
    );

    let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let response = harness.pipeline().analyze(&request("", &refs, &[])).await;

    assert_eq!(response.counts.images_processed, 5);
    assert_eq!(response.counts.images_received, 8);
    let sizes: Vec<&str> = response.image_descriptions.iter().map(|d| d.size.as_str()).collect();
    assert_eq!(sizes, vec!["103x100", "104x100", "105x100", "106x100", "107x100"]);
}

#[tokio::test]
async fn image_processing_stops_at_quota() {
    let mut fetcher = FakeFetcher::default();
    let mut urls = Vec::new();
    for i in 0..9u32 {
        let url = format!("https://img.example.com/{}.png", i);
        fetcher = fetcher.with(&url, 200, png_bytes(60 + i, 60), "image/png");
        urls.push(url);
    }
    let harness = Harness::new(
        FakeSummarizer::default(),
        FakeCaptioner::default(),
        fetcher,
        FakeTranscripts::default(),
    );

    let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let response = harness.pipeline().analyze(&request("", &refs, &[])).await;

    assert_eq!(response.counts.images_processed, 5);
    assert_eq!(response.image_descriptions.len(), 5);
    assert_eq!(harness.fetcher.requested().len(), 5);
}

#[tokio::test]
async fn youtube_video_with_transcript_is_summarized() {
    let harness = Harness::new(
        FakeSummarizer::default(),
        FakeCaptioner::default(),
        FakeFetcher::default(),
        FakeTranscripts::default().with("dQw4w9WgXcQ", LONG_TRANSCRIPT),
    );
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    let response = harness.pipeline().analyze(&request("", &[], &[url])).await;

    assert_eq!(response.counts.videos_processed, 1);
    let video = &response.video_descriptions[0];
    assert_eq!(video.url, url);
    assert_eq!(video.platform, VideoPlatform::Youtube);
    assert_eq!(video.method, VideoMethod::Transcript);
    assert!(video.description.starts_with("summary #1"));
    assert_eq!(harness.summarizer.lengths(), vec![SummaryLength::VIDEO]);
}

#[tokio::test]
async fn transcript_is_windowed_before_summarization() {
    let long = "word ".repeat(1000);
    let harness = Harness::new(
        FakeSummarizer::default(),
        FakeCaptioner::default(),
        FakeFetcher::default(),
        FakeTranscripts::default().with("abc", &long),
    );
    harness
        .pipeline()
        .analyze(&request("", &[], &["https://youtu.be/abc"]))
        .await;

    let inputs = harness.summarizer.inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].chars().count(), 2000);
}

#[tokio::test]
async fn transcript_retrieval_failure_falls_back_to_metadata() {
    let harness = Harness::default();
    let url = "https://www.youtube.com/watch?v=nocaptions1";
    let response = harness.pipeline().analyze(&request("", &[], &[url])).await;

    assert_eq!(response.counts.videos_processed, 1);
    assert_eq!(response.video_descriptions.len(), 1);
    let video = &response.video_descriptions[0];
    assert_eq!(video.method, VideoMethod::Metadata);
    assert!(video.description.contains("nocaptions1"));
    assert_eq!(harness.summarizer.call_count(), 0);
}

#[tokio::test]
async fn short_transcript_counts_as_unavailable() {
    let harness = Harness::new(
        FakeSummarizer::default(),
        FakeCaptioner::default(),
        FakeFetcher::default(),
        FakeTranscripts::default().with("short1", "[Music]"),
    );
    let response = harness
        .pipeline()
        .analyze(&request("", &[], &["https://youtu.be/short1"]))
        .await;

    assert_eq!(response.video_descriptions[0].method, VideoMethod::Metadata);
    assert_eq!(harness.summarizer.call_count(), 0);
}

#[tokio::test]
async fn transcript_summarization_failure_keeps_metadata_method() {
    let harness = Harness::new(
        FakeSummarizer::failing_on(vec![1]),
        FakeCaptioner::default(),
        FakeFetcher::default(),
        FakeTranscripts::default().with("vid42", LONG_TRANSCRIPT),
    );
    let response = harness
        .pipeline()
        .analyze(&request("", &[], &["https://youtu.be/vid42"]))
        .await;

    let video = &response.video_descriptions[0];
    assert_eq!(video.method, VideoMethod::Metadata);
    assert!(video.description.contains("vid42"));
    assert!(video.description.contains("summarization failed"));
}

#[tokio::test]
async fn unrecognized_videos_are_detection_only_and_quota_is_three() {
    let harness = Harness::default();
    let videos = [
        "https://cdn.example.com/clip.mp4",
        "not a url at all",
        "https://vimeo.com/123456",
        "https://www.youtube.com/watch?v=never-reached",
    ];
    let response = harness.pipeline().analyze(&request("", &[], &videos)).await;

    assert_eq!(response.counts.videos_received, 4);
    assert_eq!(response.counts.videos_processed, 3);
    assert_eq!(response.video_descriptions.len(), 3);
    assert_eq!(response.video_descriptions[0].platform, VideoPlatform::Generic);
    assert_eq!(response.video_descriptions[1].platform, VideoPlatform::Unknown);
    assert!(
        response
            .video_descriptions
            .iter()
            .all(|v| v.method == VideoMethod::Detection)
    );
}

#[tokio::test]
async fn identical_inputs_produce_identical_responses() {
    let image = "https://example.com/a.png";
    let build = || {
        Harness::new(
            FakeSummarizer::default(),
            FakeCaptioner::default(),
            FakeFetcher::default().with(image, 200, png_bytes(90, 90), "image/png"),
            FakeTranscripts::default().with("same", LONG_TRANSCRIPT),
        )
    };
    let req = request(&"t".repeat(2500), &[image], &["https://youtu.be/same"]);

    let first = build().pipeline().analyze(&req).await;
    let second = build().pipeline().analyze(&req).await;
    assert_eq!(first, second);
}
