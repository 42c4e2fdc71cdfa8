//! Upload pipeline integration tests.
//!
//! Run with: `cargo test -p vario-api --test upload_test`
//! Exercises the real router against a tempdir staging store and the
//! local storage backend.

mod helpers;

use axum::http::header;
use bytes::Bytes;
use futures::future::join_all;
use helpers::fixtures::{create_minimal_png, create_oversized_body};
use helpers::{setup_test_app, setup_test_app_with};
use std::future::IntoFuture;

fn is_variant_name(name: &str, resolution: u32, extension: &str) -> bool {
    let suffix = format!("_{}x{}.{}", resolution, resolution, extension);
    match name.strip_suffix(&suffix) {
        Some(id) => id.len() == 16 && id.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[tokio::test]
async fn test_valid_upload_returns_200_and_stores_variant() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/")
        .add_header("Content-Type", "image/png")
        .bytes(Bytes::from(create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 200);

    let uploaded = app.uploaded_files();
    assert_eq!(uploaded.len(), 1);
    assert!(
        is_variant_name(&uploaded[0], 300, "png"),
        "unexpected destination name: {}",
        uploaded[0]
    );

    // The staged artifact is gone once the response is out.
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_upload_produces_one_variant_per_resolution() {
    let app = setup_test_app_with(10_000_000, &["image/png"], &[2048, 1024, 300]).await;

    let response = app
        .server
        .post("/")
        .add_header("Content-Type", "image/png")
        .bytes(Bytes::from(create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 200);

    let uploaded = app.uploaded_files();
    assert_eq!(uploaded.len(), 3);
    for resolution in [2048u32, 1024, 300] {
        assert!(
            uploaded.iter().any(|n| is_variant_name(n, resolution, "png")),
            "missing variant for {}: {:?}",
            resolution,
            uploaded
        );
    }
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_disallowed_content_type_rejected_without_staging() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/")
        .add_header("Content-Type", "image/gif")
        .bytes(Bytes::from(create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.staged_files().is_empty());
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/")
        .bytes(Bytes::from(create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_oversized_stream_returns_500_and_cleans_up() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/")
        .add_header("Content-Type", "image/png")
        .bytes(Bytes::from(create_oversized_body(1500)))
        .await;

    assert_eq!(response.status_code(), 500);
    // Ingestion aborted: staged artifact removed, zero successful uploads.
    assert!(app.staged_files().is_empty());
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_undecodable_body_returns_500_and_cleans_up() {
    let app = setup_test_app().await;

    // Under the cap and correctly typed, but not a PNG: every fan-out
    // target fails individually, so the request fails server-class.
    let response = app
        .server
        .post("/")
        .add_header("Content-Type", "image/png")
        .bytes(Bytes::from(create_oversized_body(500)))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.staged_files().is_empty());
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_any_method_is_accepted() {
    let app = setup_test_app().await;

    let response = app
        .server
        .put("/")
        .add_header("Content-Type", "image/png")
        .bytes(Bytes::from(create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.uploaded_files().len(), 1);
}

#[tokio::test]
async fn test_accept_header_on_every_response() {
    let app = setup_test_app_with(1000, &["image/jpeg", "image/png"], &[300]).await;

    let ok = app
        .server
        .post("/")
        .add_header("Content-Type", "image/png")
        .bytes(Bytes::from(create_minimal_png()))
        .await;
    assert_eq!(ok.header(header::ACCEPT), "image/jpeg, image/png");

    let rejected = app
        .server
        .post("/")
        .add_header("Content-Type", "text/plain")
        .bytes(Bytes::from_static(b"nope"))
        .await;
    assert_eq!(rejected.status_code(), 400);
    assert_eq!(rejected.header(header::ACCEPT), "image/jpeg, image/png");

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), 200);
    assert_eq!(health.header(header::ACCEPT), "image/jpeg, image/png");
}

#[tokio::test]
async fn test_concurrent_uploads_stay_independent() {
    let app = setup_test_app_with(10_000_000, &["image/png"], &[300]).await;

    let responses = join_all((0..4).map(|_| {
        app.server
            .post("/")
            .add_header("Content-Type", "image/png")
            .bytes(Bytes::from(create_minimal_png()))
            .into_future()
    }))
    .await;
    for response in &responses {
        assert_eq!(response.status_code(), 200);
    }

    // Four distinct artifacts, no cross-request interference.
    let uploaded = app.uploaded_files();
    assert_eq!(uploaded.len(), 4);
    let mut ids: Vec<&str> = uploaded
        .iter()
        .map(|n| n.split('_').next().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
    assert!(app.staged_files().is_empty());
}
