use axum::extract::multipart::Field;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Local directory that holds uploads for the lifetime of a single request.
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Stream a multipart file field to disk.
    ///
    /// The stored name is a fresh UUID that keeps the client's file extension.
    pub async fn save_field(&self, mut field: Field<'_>) -> Result<UploadedFile, AppError> {
        let original_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let file_name = match original_name.as_deref().and_then(safe_extension) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        // Owned before the first write so a failed transfer still cleans up.
        let mut upload = UploadedFile {
            path: self.base_path.join(file_name),
            original_name,
            content_type,
            size: 0,
        };

        let mut file = fs::File::create(&upload.path).await?;
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read uploaded file: {}", e))
        })? {
            file.write_all(&chunk).await?;
            upload.size += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(
            path = %upload.path.display(),
            size = upload.size,
            content_type = %upload.content_type,
            "Stored upload"
        );

        Ok(upload)
    }
}

fn safe_extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 16)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// A request-scoped upload on disk. The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
    original_name: Option<String>,
    content_type: String,
    size: u64,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// MIME type declared by the client, `application/octet-stream` when absent.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn read(&self) -> Result<Vec<u8>, AppError> {
        Ok(fs::read(&self.path).await?)
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove upload"
            ),
        }
    }
}
