use crate::dtos::{GenerateResponse, GenerateTextRequest};
use crate::services::parts::{document_to_part, image_to_part};
use crate::services::{GenerativePart, UploadStore, UploadedFile};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use service_core::error::AppError;

const PROMPT_REQUIRED: &str = "Prompt is required.";

pub async fn generate_text(
    State(state): State<AppState>,
    payload: Option<Json<GenerateTextRequest>>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = payload
        .and_then(|Json(body)| body.prompt)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request(PROMPT_REQUIRED))?;

    tracing::info!(prompt_len = prompt.len(), "Generating text");

    run_generation(&state, &[GenerativePart::text(prompt)]).await
}

pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let UploadForm { prompt, file } = read_upload_form(&state.uploads, multipart, "image").await?;

    let prompt = prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request(PROMPT_REQUIRED))?;
    let image = file.ok_or_else(|| AppError::bad_request("Image is required."))?;

    tracing::info!(
        prompt_len = prompt.len(),
        image_size = image.size(),
        file_name = ?image.original_name(),
        "Generating from image"
    );

    let image_part = image_to_part(&image).await?;
    run_generation(&state, &[GenerativePart::text(prompt), image_part]).await
}

pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let UploadForm { prompt, file } =
        read_upload_form(&state.uploads, multipart, "document").await?;

    let document = file.ok_or_else(|| AppError::bad_request("Document is required."))?;

    // A prompt may be posted alongside the document; only the document is sent.
    tracing::info!(
        document_size = document.size(),
        content_type = %document.content_type(),
        prompt_supplied = prompt.is_some(),
        "Generating from document"
    );

    let document_part = document_to_part(&document).await?;
    run_generation(&state, &[document_part]).await
}

async fn run_generation(
    state: &AppState,
    parts: &[GenerativePart],
) -> Result<Json<GenerateResponse>, AppError> {
    let output = state.generator.generate(parts).await.map_err(|e| {
        tracing::error!(error = %e, "Text generation failed");
        AppError::Upstream(e.to_string())
    })?;

    tracing::debug!(output_len = output.len(), "Text generation completed");

    Ok(Json(GenerateResponse { output }))
}

#[derive(Default)]
struct UploadForm {
    prompt: Option<String>,
    file: Option<UploadedFile>,
}

/// Collect the `prompt` text field and the named file field of a multipart body.
///
/// Files land in the upload store; anything collected so far is cleaned up if a later
/// field fails to read.
async fn read_upload_form(
    store: &UploadStore,
    multipart: Result<Multipart, MultipartRejection>,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut multipart = multipart.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Invalid multipart request: {}", e.body_text()))
    })?;
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt") => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read prompt: {}", e))
                })?;
                form.prompt = Some(text);
            }
            Some(name) if name == file_field => {
                form.file = Some(store.save_field(field).await?);
            }
            other => tracing::debug!(field = ?other, "Ignoring unexpected form field"),
        }
    }

    Ok(form)
}
