//! Input validation — runs synchronously before any network call.
//!
//! Every rejection here is a `GenerationError::Validation`; the retry
//! controller never retries these, and the transport mock in tests can
//! assert zero outbound calls when inputs are rejected.

use tracing::warn;

use crate::errors::GenerationError;
use crate::models::cover_letter::CoverLetterInputs;
use crate::models::resume::ResumeDocument;

pub const MIN_RAW_TEXT_CHARS: usize = 50;
pub const MAX_RAW_TEXT_CHARS: usize = 50_000;

/// Validates and trims the free-form résumé text submitted for ingestion.
pub fn validate_raw_text(raw: &str) -> Result<String, GenerationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Validation(
            "resume text is required".to_string(),
        ));
    }
    let chars = trimmed.chars().count();
    if chars < MIN_RAW_TEXT_CHARS {
        return Err(GenerationError::Validation(format!(
            "resume text is too short (minimum {MIN_RAW_TEXT_CHARS} characters)"
        )));
    }
    if chars > MAX_RAW_TEXT_CHARS {
        return Err(GenerationError::Validation(format!(
            "resume text is too long (maximum {MAX_RAW_TEXT_CHARS} characters)"
        )));
    }
    Ok(trimmed.to_string())
}

/// Whitespace-only keys count as missing.
pub fn validate_api_key(api_key: &str) -> Result<String, GenerationError> {
    let trimmed = api_key.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Validation(
            "an API key is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_model(model: &str) -> Result<String, GenerationError> {
    let trimmed = model.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Validation(
            "a completion model id is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// A résumé fed into tailoring or cover-letter prompts must at least carry
/// a name. A missing location is tolerated — the letter header just gets
/// thinner — but is worth a warning.
pub fn validate_resume_for_prompt(resume: &ResumeDocument) -> Result<(), GenerationError> {
    if resume.name.trim().is_empty() {
        return Err(GenerationError::Validation(
            "the resume is missing a name — a valid name is required".to_string(),
        ));
    }
    if resume.contact.location.trim().is_empty() {
        warn!("Resume for '{}' has no location — continuing without one", resume.name);
    }
    Ok(())
}

/// Spontaneous-application rule: with no job position and no job
/// description, the company description is the only context the letter has,
/// so it becomes mandatory.
pub fn validate_cover_letter_inputs(inputs: &CoverLetterInputs) -> Result<(), GenerationError> {
    if inputs.is_spontaneous() && inputs.company_description.trim().is_empty() {
        return Err(GenerationError::Validation(
            "a company description is required for a spontaneous application \
             (no job position or description was provided)"
                .to_string(),
        ));
    }
    Ok(())
}
