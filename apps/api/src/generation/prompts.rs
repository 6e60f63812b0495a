//! Prompt composition — pure functions from (operation, locale, inputs) to
//! the instruction/content message pair, plus the forced tool for
//! structured operations.
//!
//! All prompt text lives here as constants with `{placeholder}` slots,
//! filled by the compose functions. Nothing in this module touches the
//! network.

use crate::errors::GenerationError;
use crate::generation::schema::resume_tool;
use crate::llm_client::{
    ChatMessage, ChatRequest, ToolSpec, PROSE_MAX_TOKENS, PROSE_TEMPERATURE,
    STRUCTURED_MAX_TOKENS, STRUCTURED_TEMPERATURE,
};
use crate::locale::Locale;
use crate::models::cover_letter::CoverLetterInputs;
use crate::models::resume::ResumeDocument;

/// Literal marker used in spontaneous-application letter titles. Tests and
/// the cover-letter template both rely on this exact string.
pub const SPONTANEOUS_APPLICATION_MARKER: &str = "Spontaneous Application";

// ────────────────────────────────────────────────────────────────────────────
// Ingestion
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for résumé ingestion. Replace `{language}`.
pub const INGEST_SYSTEM_TEMPLATE: &str = "You are a CV formatting assistant. \
    You convert free-form resume text into a clean, structured CV document. \
    Write every field in {language}. \
    Preserve the candidate's facts exactly — never invent experience, dates, or skills. \
    Keep date-like fields as plain text exactly as written (e.g. 'March 2021', 'Present'). \
    You MUST call the `submit_resume` function with the structured CV; \
    never reply with plain text.";

/// Ingestion content template. Replace `{raw_text}`.
pub const INGEST_PROMPT_TEMPLATE: &str = r#"Convert the following resume text into a structured CV document.

Group related skills into categories. Order experience entries most recent first.
If a section has no information in the text, leave it empty rather than guessing.

RESUME TEXT:
{raw_text}"#;

// ────────────────────────────────────────────────────────────────────────────
// Tailoring
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for résumé tailoring. Replace `{language}`.
pub const TAILOR_SYSTEM_TEMPLATE: &str = "You are a professional resume tailor. \
    You rework an existing structured CV so it speaks directly to a target job, \
    reordering and rephrasing without fabricating anything. \
    Write every field in {language}. \
    Record every alteration in the `changes` list with the section touched, \
    what changed, and why it helps for this job. \
    You MUST call the `submit_resume` function with the updated CV; \
    never reply with plain text.";

/// Tailoring content template. Replace `{job_title}`, `{job_description}`,
/// `{company_description}`, `{instructions}`, `{resume_json}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the CV below for this job.

TARGET JOB TITLE:
{job_title}

JOB DESCRIPTION:
{job_description}

COMPANY:
{company_description}

ADDITIONAL INSTRUCTIONS FROM THE CANDIDATE:
{instructions}

CURRENT CV (JSON):
{resume_json}

Rules:
1. Emphasize the experience and skills most relevant to the job description
2. Rephrase the summary and achievements toward the role — do NOT invent facts
3. You may reorder sections and drop clearly irrelevant entries
4. Fill `changes` with one record per meaningful alteration (section, description, reason)
5. Return the COMPLETE updated CV, not only the parts you changed"#;

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for cover-letter writing. Replace `{language}` and
/// `{title_format}`.
pub const COVER_LETTER_SYSTEM_TEMPLATE: &str = "You are a professional cover letter writer. \
    Write the letter in {language}. \
    Structure the letter exactly as: \
    a header with the candidate's name and contact details, \
    the letter title ({title_format}), \
    a salutation, \
    one paragraph on why the company is interesting, \
    one paragraph on why the candidate fits, \
    one paragraph on what the candidate would bring going forward, \
    a closing call-to-action inviting an interview, \
    and a sign-off with the candidate's name. \
    Output only the letter text — no commentary, no markdown fences.";

/// Title format for a targeted application.
pub const TARGETED_TITLE_FORMAT: &str = "'Application for the {job_position} position'";

/// Title format for a spontaneous application (no specific role).
pub const SPONTANEOUS_TITLE_FORMAT: &str =
    "'Spontaneous Application — {candidate_title}'";

/// Cover-letter content template. Replace `{application_context}`,
/// `{company_description}`, `{resume_json}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for this candidate.

{application_context}

COMPANY DESCRIPTION:
{company_description}

CANDIDATE CV (JSON):
{resume_json}

Ground every claim in the CV — do not invent experience the candidate does not have."#;

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

/// The instruction/content pair for one gateway call, plus the forced tool
/// when the operation expects structured output.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
    pub tool: Option<ToolSpec>,
}

impl ComposedPrompt {
    /// Builds the tool-forced, low-temperature request for structured
    /// operations (ingest, tailor).
    pub fn into_structured_request(self, model: &str) -> ChatRequest {
        let tool_choice = self.tool.as_ref().map(|t| t.forced_choice());
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(self.system),
                ChatMessage::user(self.user),
            ],
            temperature: STRUCTURED_TEMPERATURE,
            max_completion_tokens: STRUCTURED_MAX_TOKENS,
            tools: self.tool.map(|t| vec![t]),
            tool_choice,
        }
    }

    /// Builds the free-text, higher-temperature request for prose
    /// operations (cover letters).
    pub fn into_prose_request(self, model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(self.system),
                ChatMessage::user(self.user),
            ],
            temperature: PROSE_TEMPERATURE,
            max_completion_tokens: PROSE_MAX_TOKENS,
            tools: None,
            tool_choice: None,
        }
    }
}

pub fn compose_ingest(locale: Locale, raw_text: &str) -> ComposedPrompt {
    ComposedPrompt {
        system: INGEST_SYSTEM_TEMPLATE.replace("{language}", locale.language_name()),
        user: INGEST_PROMPT_TEMPLATE.replace("{raw_text}", raw_text),
        tool: Some(resume_tool()),
    }
}

pub fn compose_tailor(
    locale: Locale,
    resume: &ResumeDocument,
    job_title: &str,
    job_description: &str,
    company_description: &str,
    instructions: &str,
) -> Result<ComposedPrompt, GenerationError> {
    let resume_json = serialize_resume(resume)?;
    let user = TAILOR_PROMPT_TEMPLATE
        .replace("{job_title}", or_none_given(job_title))
        .replace("{job_description}", or_none_given(job_description))
        .replace("{company_description}", or_none_given(company_description))
        .replace("{instructions}", or_none_given(instructions))
        .replace("{resume_json}", &resume_json);

    Ok(ComposedPrompt {
        system: TAILOR_SYSTEM_TEMPLATE.replace("{language}", locale.language_name()),
        user,
        tool: Some(resume_tool()),
    })
}

pub fn compose_cover_letter(
    locale: Locale,
    resume: &ResumeDocument,
    inputs: &CoverLetterInputs,
) -> Result<ComposedPrompt, GenerationError> {
    let resume_json = serialize_resume(resume)?;

    let (title_format, application_context) = if inputs.is_spontaneous() {
        (
            SPONTANEOUS_TITLE_FORMAT.replace(
                "{candidate_title}",
                or_none_given(&resume.title),
            ),
            format!(
                "This is a {SPONTANEOUS_APPLICATION_MARKER}: the candidate is not applying \
                 to a specific opening. Base the letter entirely on the company description."
            ),
        )
    } else {
        (
            TARGETED_TITLE_FORMAT.replace("{job_position}", or_none_given(&inputs.job_position)),
            format!(
                "TARGET POSITION:\n{}\n\nJOB DESCRIPTION:\n{}",
                or_none_given(&inputs.job_position),
                or_none_given(&inputs.job_description)
            ),
        )
    };

    let user = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{application_context}", &application_context)
        .replace(
            "{company_description}",
            or_none_given(&inputs.company_description),
        )
        .replace("{resume_json}", &resume_json);

    Ok(ComposedPrompt {
        system: COVER_LETTER_SYSTEM_TEMPLATE
            .replace("{language}", locale.language_name())
            .replace("{title_format}", &title_format),
        user,
        tool: None,
    })
}

fn serialize_resume(resume: &ResumeDocument) -> Result<String, GenerationError> {
    serde_json::to_string_pretty(resume)
        .map_err(|e| GenerationError::InvalidDocument(format!("failed to serialize resume: {e}")))
}

fn or_none_given(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "(none given)"
    } else {
        trimmed
    }
}
