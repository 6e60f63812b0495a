//! Response extraction — resolves the untrusted gateway reply into a tagged
//! payload before any field access, then applies the semantic checks.
//!
//! The distinctions here are deliberate: a reply with no tool call fails
//! differently from one whose arguments are not JSON, which fails
//! differently from a parsed document missing its name. Each maps to its
//! own `GenerationError` variant so the classifier and the caller can tell
//! them apart.

use tracing::warn;

use crate::errors::GenerationError;
use crate::generation::schema::RESUME_TOOL_NAME;
use crate::llm_client::ChatReply;
use crate::models::resume::ResumeDocument;

/// Minimum accepted cover-letter length. Anything this short is a refusal
/// or an apology, not a letter.
pub const MIN_LETTER_CHARS: usize = 10;

/// Every reply resolves to exactly one of these before field access.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPayload {
    ToolCall { name: String, arguments: String },
    Text(String),
    Empty,
}

/// Resolves the first choice of a reply. Extra choices and extra fields are
/// ignored; a missing choice, null content, and an empty tool-call list all
/// collapse to `Empty`.
pub fn resolve_reply(reply: &ChatReply) -> ReplyPayload {
    let Some(choice) = reply.choices.first() else {
        return ReplyPayload::Empty;
    };

    if let Some(calls) = &choice.message.tool_calls {
        if let Some(call) = calls.first() {
            return ReplyPayload::ToolCall {
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            };
        }
    }

    match &choice.message.content {
        Some(content) if !content.trim().is_empty() => {
            ReplyPayload::Text(content.trim().to_string())
        }
        _ => ReplyPayload::Empty,
    }
}

/// Structured path: the forced `submit_resume` call must be present with
/// JSON arguments that parse into a document carrying a name and title.
pub fn extract_document(reply: &ChatReply) -> Result<ResumeDocument, GenerationError> {
    let (name, arguments) = match resolve_reply(reply) {
        ReplyPayload::ToolCall { name, arguments } => (name, arguments),
        _ => return Err(GenerationError::MissingToolCall),
    };

    if name != RESUME_TOOL_NAME {
        warn!("Model called '{name}' instead of '{RESUME_TOOL_NAME}'");
        return Err(GenerationError::MissingToolCall);
    }

    let document: ResumeDocument = serde_json::from_str(&arguments)
        .map_err(|e| GenerationError::MalformedArguments(e.to_string()))?;

    validate_document(&document)?;
    Ok(document)
}

/// Semantic invariants on a parsed document.
pub fn validate_document(document: &ResumeDocument) -> Result<(), GenerationError> {
    if document.name.trim().is_empty() {
        return Err(GenerationError::InvalidDocument(
            "CV must contain a valid name".to_string(),
        ));
    }
    if document.title.trim().is_empty() {
        return Err(GenerationError::InvalidDocument(
            "CV must contain a valid title".to_string(),
        ));
    }
    Ok(())
}

/// Prose path: the letter must be non-empty and long enough to be a letter.
/// A letter that never mentions the candidate is suspicious but accepted —
/// warning only.
pub fn extract_letter(
    reply: &ChatReply,
    candidate_name: &str,
) -> Result<String, GenerationError> {
    let content = match resolve_reply(reply) {
        ReplyPayload::Text(content) => content,
        _ => return Err(GenerationError::EmptyContent),
    };

    if content.chars().count() <= MIN_LETTER_CHARS {
        return Err(GenerationError::InvalidLetter(
            "content too short".to_string(),
        ));
    }

    let name = candidate_name.trim();
    if !name.is_empty() && !content.contains(name) {
        warn!("Cover letter does not mention the candidate's name ('{name}')");
    }

    Ok(content)
}
