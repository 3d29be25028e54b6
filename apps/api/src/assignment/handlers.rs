//! Axum route handler for question answering.

use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::assignment::{classify, prompts::build_prompt};
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::{materialize_in_background, ParsedData, UploadedFile};

pub const QUESTION_REQUIRED: &str = "Question is required";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct AskJsonRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Question plus optional upload, from whichever body shape the client sent.
#[derive(Debug, Default)]
struct AskInput {
    question: Option<String>,
    file: Option<UploadedFile>,
}

/// POST /api
///
/// Accepts `multipart/form-data` (`question`, optional `file`) or a JSON body
/// `{"question": ...}`. Classifies the question, materializes the upload,
/// builds the prompt and returns the model's answer.
pub async fn handle_ask(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AskResponse>, AppError> {
    let span = info_span!("ask", request_id = %Uuid::new_v4());
    answer_question(state, request).instrument(span).await
}

async fn answer_question(state: AppState, request: Request) -> Result<Json<AskResponse>, AppError> {
    let AskInput { question, file } = read_input(&state, request).await?;

    let question = question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation(QUESTION_REQUIRED.to_string()))?;

    let assignment = classify(&question);
    info!("Classified question as {assignment}");

    let data = match file {
        Some(file) => {
            materialize_in_background(file, assignment, state.config.scratch_dir.clone()).await?
        }
        None => ParsedData::Absent,
    };
    info!("Materialized upload as {}", data.shape());

    let prompt = build_prompt(&question, assignment, &data);
    let answer = state.completer.complete(&prompt).await?;

    Ok(Json(AskResponse { answer }))
}

async fn read_input(state: &AppState, request: Request) -> Result<AskInput, AppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.body_text())))?;
        read_multipart(multipart, state.config.max_upload_bytes).await
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<AskJsonRequest>::from_request(request, state)
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    too_large(state.config.max_upload_bytes)
                } else {
                    AppError::Validation(e.body_text())
                }
            })?;
        Ok(AskInput {
            question: body.question,
            file: None,
        })
    } else {
        Ok(AskInput::default())
    }
}

/// Takes the first `question` field and the first `file` field; everything
/// else is skipped.
async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<AskInput, AppError> {
    let mut input = AskInput::default();
    let invalid_multipart = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large(limit)
        } else {
            AppError::Internal(anyhow::anyhow!("Invalid multipart body: {}", err.body_text()))
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("question") if input.question.is_none() => {
                input.question = Some(field.text().await.map_err(invalid_multipart)?);
            }
            Some("file") if input.file.is_none() => {
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let file_name = field.file_name().unwrap_or_default().to_string();
                let buffer = field.bytes().await.map_err(invalid_multipart)?;
                input.file = Some(UploadedFile {
                    buffer,
                    content_type,
                    file_name,
                });
            }
            _ => {}
        }
    }

    Ok(input)
}

fn too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "Request body exceeds the {limit}-byte upload limit"
    ))
}
