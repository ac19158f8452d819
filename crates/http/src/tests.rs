#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use facematch_core::Settings;
use facematch_embeddings::{ExtractionError, FeatureExtractor};
use facematch_storage::{Repository, StorageBackend};
use http_body_util::BodyExt; // for `collect`
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use crate::{AppState, create_router};

const DIM: usize = 4;
const LIMIT: usize = 1024;
const BOUNDARY: &str = "facematch-test-boundary";

/// First image byte picks the axis of the returned unit vector. `0xEE` means
/// no face and `0xDD` an unavailable extractor.
struct AxisExtractor;

#[async_trait]
impl FeatureExtractor for AxisExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<f32>, ExtractionError> {
        match image.first() {
            None => Err(ExtractionError::EmptyImage),
            Some(0xEE) => Err(ExtractionError::NoFace),
            Some(0xDD) => Err(ExtractionError::HttpStatus { code: 502, body: String::new() }),
            Some(b) => {
                let mut v = vec![0.0; DIM];
                v[usize::from(*b) % DIM] = 1.0;
                Ok(v)
            },
        }
    }

    fn model(&self) -> &str {
        "axis"
    }
}

fn app() -> Router {
    app_over(StorageBackend::new_memory())
}

fn app_over(backend: StorageBackend) -> Router {
    let settings = Settings::default()
        .with_dimension(DIM)
        .with_max_payload_bytes(LIMIT)
        .with_archive_uploads(false);
    let repository = Arc::new(Repository::new(backend, DIM));
    create_router(Arc::new(AppState::new(settings, repository, Arc::new(AxisExtractor))))
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            },
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            },
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn enroll(app: &Router, subject: &str, axes: &[u8]) {
    let mut parts: Vec<Part<'_>> =
        axes.iter().map(|a| Part::File("files", "face.jpg", vec![*a, 0, 0])).collect();
    parts.push(Part::Text("subject_id", subject));
    let (status, _) = send(app, multipart_request("/upload", &parts)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn upload_stores_embeddings() {
    let app = app();
    let request = multipart_request(
        "/upload",
        &[
            Part::Text("subject_id", "s-100"),
            Part::File("files", "a.jpg", vec![0, 1]),
            Part::File("files", "b.jpg", vec![1, 1]),
        ],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject_id"], "s-100");
    assert_eq!(body["stored"], 2);
    assert_eq!(body["failures"].as_array().unwrap().len(), 0);

    let (status, body) = send(&app, get("/api/subjects/s-100")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embeddings"], 2);
    assert_eq!(body["dimension"], DIM);
}

#[tokio::test]
async fn upload_accepts_student_id_field() {
    let app = app();
    let request = multipart_request(
        "/upload",
        &[Part::Text("student_id", "legacy"), Part::File("files", "a.jpg", vec![2])],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject_id"], "legacy");
}

#[tokio::test]
async fn upload_reports_partial_failures() {
    let app = app();
    let request = multipart_request(
        "/upload",
        &[
            Part::Text("subject_id", "s1"),
            Part::File("files", "good.jpg", vec![0]),
            Part::File("files", "blank.jpg", vec![0xEE]),
        ],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stored"], 1);
    assert_eq!(body["failures"][0]["index"], 1);
    assert_eq!(body["failures"][0]["name"], "blank.jpg");
}

#[tokio::test]
async fn upload_all_images_rejected_is_422() {
    let app = app();
    let request = multipart_request(
        "/upload",
        &[Part::Text("subject_id", "s1"), Part::File("files", "blank.jpg", vec![0xEE])],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["failures"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/api/subjects/s1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_validation_errors_are_400() {
    let app = app();

    let missing_subject = multipart_request("/upload", &[Part::File("files", "a.jpg", vec![0])]);
    let (status, body) = send(&app, missing_subject).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("subject_id"));

    let blank_subject = multipart_request(
        "/upload",
        &[Part::Text("subject_id", "   "), Part::File("files", "a.jpg", vec![0])],
    );
    let (status, _) = send(&app, blank_subject).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let no_files = multipart_request("/upload", &[Part::Text("subject_id", "s1")]);
    let (status, _) = send(&app, no_files).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let oversize = multipart_request(
        "/upload",
        &[
            Part::Text("subject_id", "s1"),
            Part::File("files", "a.jpg", vec![0; LIMIT / 2 + 1]),
            Part::File("files", "b.jpg", vec![0; LIMIT / 2 + 1]),
        ],
    );
    let (status, _) = send(&app, oversize).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn compare_match_is_200() {
    let app = app();
    enroll(&app, "s1", &[0, 1]).await;

    let request = multipart_request(
        "/compare",
        &[Part::Text("subject_id", "s1"), Part::File("file", "q.jpg", vec![1])],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "match");
    assert_eq!(body["matched_index"], 1);
    assert_eq!(body["similarity"], 1.0);
}

#[tokio::test]
async fn compare_no_match_is_403() {
    let app = app();
    enroll(&app, "s1", &[0]).await;

    let request = multipart_request(
        "/compare",
        &[Part::Text("subject_id", "s1"), Part::File("file", "q.jpg", vec![3])],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["result"], "no_match");
    assert_eq!(body["best_similarity"], 0.0);
}

#[tokio::test]
async fn compare_unknown_subject_is_404() {
    let app = app();
    let request = multipart_request(
        "/compare",
        &[Part::Text("subject_id", "ghost"), Part::File("file", "q.jpg", vec![0])],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["result"], "subject_not_found");
}

#[tokio::test]
async fn compare_extraction_failures() {
    let app = app();
    enroll(&app, "s1", &[0]).await;

    let no_face = multipart_request(
        "/compare",
        &[Part::Text("subject_id", "s1"), Part::File("file", "q.jpg", vec![0xEE])],
    );
    let (status, _) = send(&app, no_face).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let extractor_down = multipart_request(
        "/compare",
        &[Part::Text("subject_id", "s1"), Part::File("file", "q.jpg", vec![0xDD])],
    );
    let (status, _) = send(&app, extractor_down).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn compare_on_corrupt_storage_is_500() {
    // Same store, written by a deployment configured for a wider model.
    let backend = StorageBackend::new_memory();
    let wide = Repository::new(backend.clone(), DIM + 1);
    wide.upsert("s1", vec![vec![1.0; DIM + 1]]).await.unwrap();
    let app = app_over(backend);

    let request = multipart_request(
        "/compare",
        &[Part::Text("subject_id", "s1"), Part::File("file", "q.jpg", vec![0])],
    );
    let (status, body) = send(&app, request).await;
    assert_ne!(status, StatusCode::FORBIDDEN);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
    assert!(body.get("result").is_none());

    let (status, _) = send(&app, get("/api/subjects/s1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn compare_requires_exactly_one_file() {
    let app = app();
    let none = multipart_request("/compare", &[Part::Text("subject_id", "s1")]);
    let (status, _) = send(&app, none).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let two = multipart_request(
        "/compare",
        &[
            Part::Text("subject_id", "s1"),
            Part::File("file", "a.jpg", vec![0]),
            Part::File("file", "b.jpg", vec![1]),
        ],
    );
    let (status, _) = send(&app, two).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_and_settings() {
    let app = app();
    enroll(&app, "a", &[0]).await;
    enroll(&app, "b", &[1]).await;
    enroll(&app, "a", &[2]).await;

    let (status, body) = send(&app, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subjects"], 2);
    assert_eq!(body["storage_backend"], "memory");

    let (status, body) = send(&app, get("/api/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["dimension"], DIM);
    assert_eq!(body["extractor_model"], "axis");
}
