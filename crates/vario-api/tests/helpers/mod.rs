//! Shared test setup: builds the real router against a tempdir-backed
//! staging store and local storage backend.

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use storage::TestStorage;
use tempfile::TempDir;
use vario_core::{Config, StorageBackend, StorageConfig};

pub struct TestApp {
    pub server: TestServer,
    pub staging_dir: TempDir,
    pub storage: TestStorage,
}

impl TestApp {
    /// Names of files currently staged (should be empty once a request
    /// has finished, success or failure).
    pub fn staged_files(&self) -> Vec<String> {
        list_dir(self.staging_dir.path())
    }

    /// Names of objects stored by the local uploader.
    pub fn uploaded_files(&self) -> Vec<String> {
        list_dir(&self.storage.base_path)
    }
}

fn list_dir(path: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .expect("Failed to read directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Tight defaults: 1000-byte cap, PNG only, single 300 target.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(1000, &["image/png"], &[300]).await
}

pub async fn setup_test_app_with(
    max_upload_size: u64,
    allowed: &[&str],
    resolutions: &[u32],
) -> TestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create staging directory");
    let storage = TestStorage::new();

    let config = Config {
        server_port: 0,
        max_upload_size,
        allowed_content_types: allowed.iter().map(|s| s.to_lowercase()).collect(),
        resize_resolutions: resolutions.to_vec(),
        staging_path: staging_dir.path().to_path_buf(),
        storage: StorageConfig {
            backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            local_path: Some(storage.base_path_str()),
            local_base_url: Some(storage.base_url.clone()),
        },
    };

    let (_state, router) = vario_api::setup::initialize_app(config)
        .await
        .expect("Failed to initialize app");
    let server = TestServer::new(router).expect("Failed to build test server");

    TestApp {
        server,
        staging_dir,
        storage,
    }
}
