//! Conversion of uploads into model input parts.

use super::providers::GenerativePart;
use super::uploads::UploadedFile;
use service_core::error::AppError;
use std::path::Path;

const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Infer an image MIME type from the file extension.
///
/// Anything unrecognised is sent as JPEG.
pub fn mime_type_for_image(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        other => {
            tracing::warn!(
                extension = %other,
                "Unsupported image type, defaulting to {}",
                FALLBACK_IMAGE_MIME
            );
            FALLBACK_IMAGE_MIME
        }
    }
}

pub async fn image_to_part(image: &UploadedFile) -> Result<GenerativePart, AppError> {
    let mime_type = mime_type_for_image(image.path());
    let bytes = image.read().await?;
    Ok(GenerativePart::inline(&bytes, mime_type))
}

/// Documents keep the content type the client declared.
pub async fn document_to_part(document: &UploadedFile) -> Result<GenerativePart, AppError> {
    let bytes = document.read().await?;
    Ok(GenerativePart::inline(&bytes, document.content_type()))
}
