#![allow(dead_code)]

use genai_gateway::config::GatewayConfig;
use genai_gateway::services::providers::mock::MockTextGenerator;
use genai_gateway::services::TextGenerator;
use genai_gateway::startup::Application;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the gateway on a random port around the given generator.
    pub async fn spawn(generator: Arc<dyn TextGenerator>) -> Self {
        let mut config = GatewayConfig::default();
        config.common.host = "127.0.0.1".to_string();
        config.common.port = 0; // Random port for testing
        config.uploads.dir = PathBuf::from(format!("target/test-uploads-{}", Uuid::new_v4()));
        config.static_dir = PathBuf::from(format!("target/test-static-{}", Uuid::new_v4()));

        let app = Application::build_with_generator(config, generator)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let upload_dir = app.state().uploads.base_path().to_path_buf();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        Self {
            address,
            port,
            upload_dir,
            client,
        }
    }

    /// Spawn with a mock that answers every call with `reply`.
    pub async fn with_reply(reply: &str) -> (Self, Arc<MockTextGenerator>) {
        let mock = Arc::new(MockTextGenerator::replying(reply));
        (Self::spawn(mock.clone()).await, mock)
    }

    /// Spawn with a mock that fails every call with `message`.
    pub async fn with_failure(message: &str) -> (Self, Arc<MockTextGenerator>) {
        let mock = Arc::new(MockTextGenerator::failing(message));
        (Self::spawn(mock.clone()).await, mock)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Number of files currently sitting in the upload directory.
    pub fn stored_uploads(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.upload_dir).await;
    }
}

pub fn file_part(bytes: &[u8], file_name: &str, mime: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("valid mime type")
}
