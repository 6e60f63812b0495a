//! Axum route handlers for the generation API.
//!
//! Handlers stay thin: deserialize, delegate to `generator`, map failures
//! to `AppError`. The pipeline owns all validation and retry behavior.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::generator::{
    generate_cover_letter, ingest_resume, tailor_resume, CoverLetterRequest, IngestRequest,
    TailorRequest,
};
use crate::models::cover_letter::CoverLetterResult;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: ResumeDocument,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub letter: CoverLetterResult,
}

/// POST /api/v1/generate/ingest
///
/// Converts free-form résumé text into a structured document.
pub async fn handle_ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resume = ingest_resume(
        state.gateway.as_ref(),
        &state.config.gateway_defaults(),
        request,
    )
    .await?;
    Ok(Json(ResumeResponse { resume }))
}

/// POST /api/v1/generate/tailor
///
/// Rewrites an existing document toward a target job description.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resume = tailor_resume(
        state.gateway.as_ref(),
        &state.config.gateway_defaults(),
        request,
    )
    .await?;
    Ok(Json(ResumeResponse { resume }))
}

/// POST /api/v1/generate/cover-letter
///
/// Writes a targeted or spontaneous cover letter for the given document.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let letter = generate_cover_letter(
        state.gateway.as_ref(),
        &state.config.gateway_defaults(),
        request,
    )
    .await?;
    Ok(Json(CoverLetterResponse { letter }))
}
