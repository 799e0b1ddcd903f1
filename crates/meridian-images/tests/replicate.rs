//! Integration tests for the Replicate client and the batch image stage.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meridian_core::Topic;
use meridian_images::{
    generate_images, image_prompt, ImageError, ReplicateClient, ReplicateSettings,
};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

fn settings(max_polls: u32) -> ReplicateSettings {
    ReplicateSettings {
        api_token: "r8_test".to_string(),
        request_timeout_secs: 5,
        poll_interval_ms: 0,
        max_polls,
    }
}

fn topic(rank: usize) -> Topic {
    Topic {
        rank,
        title: format!("Topic {rank}"),
        title_en: format!("Topic {rank}"),
        description: "d".to_string(),
        keywords: vec!["AI".to_string()],
        importance: 5,
    }
}

async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/models/black-forest-labs/flux-schnell/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pred-1",
            "status": "starting",
            "urls": { "get": format!("{}/v1/predictions/pred-1", server.uri()) },
            "output": null
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/predictions/pred-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pred-1",
            "status": "succeeded",
            "output": [format!("{}/files/out.png", server.uri())]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Single image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_image_creates_polls_and_downloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/models/black-forest-labs/flux-schnell/predictions"))
        .and(header("Authorization", "Bearer r8_test"))
        .and(body_partial_json(json!({
            "input": {
                "prompt": "a prompt",
                "num_outputs": 1,
                "aspect_ratio": "1:1",
                "output_format": "png",
                "output_quality": 90
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pred-1",
            "status": "starting",
            "urls": { "get": format!("{}/v1/predictions/pred-1", server.uri()) }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_happy_path(&server).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("topic_01.png");
    let client = ReplicateClient::with_base_url(settings(5), &server.uri()).expect("client");

    let written = client.generate_image("a prompt", &dest).await.expect("generate");
    assert_eq!(written, dest);
    assert_eq!(std::fs::read(&dest).expect("read image"), PNG_BYTES);
}

#[tokio::test]
async fn failed_prediction_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/models/black-forest-labs/flux-schnell/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "starting",
            "urls": { "get": format!("{}/v1/predictions/bad", server.uri()) }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/predictions/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "error": "NSFW content detected"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = ReplicateClient::with_base_url(settings(5), &server.uri()).expect("client");
    let result = client.generate_image("p", &dir.path().join("x.png")).await;
    assert!(
        matches!(result, Err(ImageError::PredictionFailed { ref error, .. }) if error.as_deref() == Some("NSFW content detected")),
        "expected PredictionFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn poll_limit_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/models/black-forest-labs/flux-schnell/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "starting",
            "urls": { "get": format!("{}/v1/predictions/slow", server.uri()) }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/predictions/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = ReplicateClient::with_base_url(settings(3), &server.uri()).expect("client");
    let result = client.generate_image("p", &dir.path().join("x.png")).await;
    assert!(matches!(result, Err(ImageError::Timeout { polls: 3 })));
}

#[tokio::test]
async fn rejected_token_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = ReplicateClient::with_base_url(settings(3), &server.uri()).expect("client");
    let result = client.generate_image("p", &dir.path().join("x.png")).await;
    assert!(matches!(result, Err(ImageError::UnexpectedStatus { status: 401, .. })));
}

// ---------------------------------------------------------------------------
// Batch stage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_keeps_rank_slots_when_one_topic_fails() {
    let server = MockServer::start().await;
    let topics: Vec<Topic> = (1..=10).map(topic).collect();

    let failing_prompt = image_prompt(&topics[2]).expect("prompt");
    Mock::given(method("POST"))
        .and(path("/v1/models/black-forest-labs/flux-schnell/predictions"))
        .and(body_partial_json(json!({ "input": { "prompt": failing_prompt } })))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_happy_path(&server).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let images_dir = dir.path().join("images");
    let client = ReplicateClient::with_base_url(settings(5), &server.uri()).expect("client");

    let slots = generate_images(&client, &topics, &images_dir, 3)
        .await
        .expect("batch");

    assert_eq!(slots.len(), 10);
    assert!(slots[2].is_none(), "rank 3 should have no image");
    for (i, slot) in slots.iter().enumerate() {
        if i == 2 {
            continue;
        }
        let image = slot.as_ref().expect("image present");
        assert_eq!(image.rank, i + 1);
        assert_eq!(image.filename, format!("topic_{:02}.png", i + 1));
        assert!(image.path.exists());
    }
    assert!(!images_dir.join("topic_03.png").exists());
}

#[tokio::test]
async fn batch_with_no_topics_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = ReplicateClient::with_base_url(settings(1), &server.uri()).expect("client");
    let slots = generate_images(&client, &[], &dir.path().join("images"), 2)
        .await
        .expect("batch");
    assert!(slots.is_empty());
}
