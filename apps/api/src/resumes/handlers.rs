use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{apply_filename_fallback, detect_format, extract_text};
use crate::models::resume::{ParsedResumeRow, ResumeSummaryRow};
use crate::parser::{
    ensure_sufficient_text, NameSource, ParseOutcome, ParseReport, ParsedResume, ResumeParser,
};
use crate::resumes::NewParsedResume;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
    /// Used only for the fallback name when the text yields none.
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub resume: ParsedResume,
    pub report: ParseReport,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub resume: ParsedResume,
    pub report: ParseReport,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    ensure_sufficient_text(&req.text, state.config.min_text_chars)?;
    let outcome = run_parser(state.parser.clone(), req.text, req.filename).await?;
    Ok(Json(ParseResponse {
        resume: outcome.resume,
        report: outcome.report,
    }))
}

/// POST /api/v1/resumes/upload (multipart, field `file`)
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, content_type, bytes));
        break;
    }

    let (filename, content_type, bytes) = upload
        .ok_or_else(|| AppError::Validation("Multipart field 'file' is required".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let format = detect_format(&bytes, filename.as_deref(), content_type.as_deref())?;
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed during extraction: {e}"))
        })??;

    ensure_sufficient_text(&text, state.config.min_text_chars)?;
    let text_chars = i32::try_from(text.trim().chars().count()).unwrap_or(i32::MAX);

    let outcome = run_parser(state.parser.clone(), text, filename.clone()).await?;
    let row = state
        .store
        .save(NewParsedResume {
            source_filename: filename,
            text_chars,
            resume: outcome.resume.clone(),
        })
        .await?;

    info!(
        id = %row.id,
        format = ?format,
        score = outcome.report.overall_score,
        "Stored parsed resume for {}",
        row.candidate_name
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: row.id,
            resume: outcome.resume,
            report: outcome.report,
        }),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ResumeSummaryRow>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let rows = state.store.list_recent(limit).await?;
    Ok(Json(rows))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParsedResumeRow>, AppError> {
    let row = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(row))
}

/// Runs the engine off the async executor and applies the filename fallback.
async fn run_parser(
    parser: Arc<ResumeParser>,
    text: String,
    filename: Option<String>,
) -> Result<ParseOutcome, AppError> {
    tokio::task::spawn_blocking(move || {
        let mut outcome = parser.analyze(&text);
        if apply_filename_fallback(&mut outcome.resume, filename.as_deref()) {
            outcome.report.name_source = NameSource::Filename;
        }
        outcome
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed while parsing: {e}")))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
