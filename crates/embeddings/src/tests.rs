#![allow(clippy::unwrap_used, reason = "test code")]

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::truncate;
use crate::{ExtractionError, FeatureExtractor, HttpExtractor, image_data_uri};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn extractor(server: &MockServer) -> HttpExtractor {
    HttpExtractor::new(&server.uri(), "VGG-Face")
        .unwrap()
        .with_retry_delays(vec![std::time::Duration::ZERO; 3])
}

#[tokio::test]
async fn test_extract_returns_first_embedding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .and(body_partial_json(json!({"model_name": "VGG-Face", "enforce_detection": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"embedding": [0.25, -0.5, 1.0], "face_confidence": 0.98},
                {"embedding": [9.0, 9.0, 9.0], "face_confidence": 0.51}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedding = extractor(&server).extract(PNG_HEADER).await.unwrap();
    assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn test_extract_empty_results_is_no_face() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let err = extractor(&server).extract(PNG_HEADER).await.unwrap_err();
    assert!(matches!(err, ExtractionError::NoFace));
    assert!(err.is_image_rejection());
}

#[tokio::test]
async fn test_extract_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Face could not be detected in numpy array."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = extractor(&server).extract(PNG_HEADER).await.unwrap_err();
    match err {
        ExtractionError::HttpStatus { code, ref body } => {
            assert_eq!(code, 400);
            assert!(body.contains("Face could not be detected"));
        },
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_image_rejection());
}

#[tokio::test]
async fn test_extract_retries_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"embedding": [1.0]}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let embedding = extractor(&server).extract(PNG_HEADER).await.unwrap();
    assert_eq!(embedding, vec![1.0]);
}

#[tokio::test]
async fn test_extract_gives_up_after_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let err = extractor(&server).extract(PNG_HEADER).await.unwrap_err();
    assert!(matches!(err, ExtractionError::RetriesExhausted(_)));
}

#[tokio::test]
async fn test_extract_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/represent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = extractor(&server).extract(PNG_HEADER).await.unwrap_err();
    assert!(matches!(err, ExtractionError::JsonParse { .. }));
}

#[tokio::test]
async fn test_extract_empty_image_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let err = extractor(&server).extract(&[]).await.unwrap_err();
    assert!(matches!(err, ExtractionError::EmptyImage));
}

#[test]
fn test_data_uri_sniffs_mime() {
    assert!(image_data_uri(PNG_HEADER).starts_with("data:image/png;base64,"));
    assert!(image_data_uri(&[0xff, 0xd8, 0xff, 0xe0]).starts_with("data:image/jpeg;base64,"));
    assert!(image_data_uri(b"GIF89a").starts_with("data:image/gif;base64,"));
    assert!(image_data_uri(b"RIFF\0\0\0\0WEBPVP8 ").starts_with("data:image/webp;base64,"));
    assert_eq!(image_data_uri(b"abc"), "data:image/jpeg;base64,YWJj");
}

#[test]
fn test_trailing_slash_trimmed_from_base_url() {
    let extractor = HttpExtractor::new("http://localhost:5005/", "Facenet").unwrap();
    assert_eq!(extractor.base_url(), "http://localhost:5005");
    assert_eq!(extractor.model(), "Facenet");
}

#[test]
fn test_truncate_unicode_boundary() {
    let s = "лицо";
    assert!(truncate(s, 3).len() <= 3);
    assert_eq!(truncate("hello", 10), "hello");
}
