//! Generation pipeline — orchestrates the three caller-facing operations.
//!
//! Flow per operation: validate inputs → (retry-wrapped) compose prompt →
//! gateway call → extract + semantic validation. Validation runs once,
//! synchronously, before the retry loop, so bad input never costs a network
//! call. The pipeline holds no state: a request is consumed exactly once
//! and persistence is the caller's business.

use serde::Deserialize;
use tracing::info;

use crate::errors::GenerationError;
use crate::generation::extract::{extract_document, extract_letter};
use crate::generation::prompts::{compose_cover_letter, compose_ingest, compose_tailor};
use crate::generation::retry::{run_with_retry, GenerationFailure};
use crate::generation::validation::{
    validate_api_key, validate_cover_letter_inputs, validate_model, validate_raw_text,
    validate_resume_for_prompt,
};
use crate::llm_client::{CompletionGateway, GatewayConfig};
use crate::locale::Locale;
use crate::models::cover_letter::{CoverLetterInputs, CoverLetterResult};
use crate::models::resume::ResumeDocument;

// ────────────────────────────────────────────────────────────────────────────
// Request types — immutable once submitted
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub raw_text: String,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    pub resume: ResumeDocument,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub company_description: String,
    /// Free-form instructions from the candidate ("keep it to one page").
    #[serde(default)]
    pub instructions: String,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetterRequest {
    pub resume: ResumeDocument,
    #[serde(default)]
    pub job_position: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub company_description: String,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub locale: Option<String>,
}

impl CoverLetterRequest {
    fn inputs(&self) -> CoverLetterInputs {
        CoverLetterInputs {
            job_position: self.job_position.trim().to_string(),
            job_description: self.job_description.trim().to_string(),
            company_description: self.company_description.trim().to_string(),
        }
    }
}

fn reject(error: GenerationError) -> GenerationFailure {
    GenerationFailure::before_first_attempt(&error)
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Converts free-form résumé text into a structured document.
pub async fn ingest_resume(
    gateway: &dyn CompletionGateway,
    defaults: &GatewayConfig,
    request: IngestRequest,
) -> Result<ResumeDocument, GenerationFailure> {
    let raw_text = validate_raw_text(&request.raw_text).map_err(reject)?;
    let api_key = validate_api_key(&request.api_key).map_err(reject)?;
    let model = validate_model(&request.model).map_err(reject)?;
    let locale = Locale::resolve_or_default(request.locale.as_deref());
    let config = defaults.with_api_key(api_key);

    info!("Ingesting resume text ({} chars, locale {})", raw_text.chars().count(), locale.code());

    run_with_retry(|attempt| {
        let chat_request = compose_ingest(locale, &raw_text).into_structured_request(&model);
        let config = &config;
        async move {
            tracing::debug!("Ingestion attempt {attempt}");
            let reply = gateway.complete(config, chat_request).await?;
            extract_document(&reply)
        }
    })
    .await
}

/// Produces a job-targeted revision of an existing document. The model's
/// reply is treated as a delta and merged over the original, so omitted
/// sections survive untouched.
pub async fn tailor_resume(
    gateway: &dyn CompletionGateway,
    defaults: &GatewayConfig,
    request: TailorRequest,
) -> Result<ResumeDocument, GenerationFailure> {
    validate_resume_for_prompt(&request.resume).map_err(reject)?;
    if request.job_description.trim().is_empty() {
        return Err(reject(GenerationError::Validation(
            "a job description is required for tailoring".to_string(),
        )));
    }
    let api_key = validate_api_key(&request.api_key).map_err(reject)?;
    let model = validate_model(&request.model).map_err(reject)?;
    let locale = Locale::resolve_or_default(request.locale.as_deref());
    let config = defaults.with_api_key(api_key);

    info!("Tailoring resume for '{}' (locale {})", request.resume.name, locale.code());

    let original = &request.resume;
    run_with_retry(|attempt| {
        let composed = compose_tailor(
            locale,
            original,
            &request.job_title,
            &request.job_description,
            &request.company_description,
            &request.instructions,
        );
        let config = &config;
        let model = &model;
        async move {
            tracing::debug!("Tailoring attempt {attempt}");
            let chat_request = composed?.into_structured_request(model);
            let reply = gateway.complete(config, chat_request).await?;
            let delta = extract_document(&reply)?;
            Ok(delta.merged_over(original))
        }
    })
    .await
}

/// Writes a cover letter grounded in the candidate's document. Supports
/// both targeted and spontaneous applications.
pub async fn generate_cover_letter(
    gateway: &dyn CompletionGateway,
    defaults: &GatewayConfig,
    request: CoverLetterRequest,
) -> Result<CoverLetterResult, GenerationFailure> {
    validate_resume_for_prompt(&request.resume).map_err(reject)?;
    let inputs = request.inputs();
    validate_cover_letter_inputs(&inputs).map_err(reject)?;
    let api_key = validate_api_key(&request.api_key).map_err(reject)?;
    let model = validate_model(&request.model).map_err(reject)?;
    let locale = Locale::resolve_or_default(request.locale.as_deref());
    let config = defaults.with_api_key(api_key);

    info!(
        "Generating {} cover letter for '{}' (locale {})",
        if inputs.is_spontaneous() { "spontaneous" } else { "targeted" },
        request.resume.name,
        locale.code()
    );

    let resume = &request.resume;
    let content = run_with_retry(|attempt| {
        let composed = compose_cover_letter(locale, resume, &inputs);
        let config = &config;
        let model = &model;
        async move {
            tracing::debug!("Cover letter attempt {attempt}");
            let chat_request = composed?.into_prose_request(model);
            let reply = gateway.complete(config, chat_request).await?;
            extract_letter(&reply, &resume.name)
        }
    })
    .await?;

    Ok(CoverLetterResult { content, inputs })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::classify::ErrorKind;
    use crate::generation::schema::RESUME_TOOL_NAME;
    use crate::llm_client::{
        ChatChoice, ChatReply, ChatRequest, ReplyMessage, ToolCall, ToolCallFunction,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Scripted transport double: pops one outcome per call and counts
    /// every invocation, so tests can assert exact call counts.
    struct MockGateway {
        replies: Mutex<VecDeque<Result<ChatReply, GenerationError>>>,
        calls: AtomicU32,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl MockGateway {
        fn new(replies: Vec<Result<ChatReply, GenerationError>>) -> Self {
            MockGateway {
                replies: Mutex::new(replies.into()),
                calls: AtomicU32::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionGateway for MockGateway {
        async fn complete(
            &self,
            _config: &GatewayConfig,
            request: ChatRequest,
        ) -> Result<ChatReply, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Network("script exhausted".to_string())))
        }
    }

    fn defaults() -> GatewayConfig {
        GatewayConfig {
            base_url: "https://gateway.test/api/v1".to_string(),
            api_key: String::new(),
            referrer: "https://vitae.test".to_string(),
            app_title: "Vitae".to_string(),
        }
    }

    fn tool_reply(arguments: &str) -> ChatReply {
        ChatReply {
            choices: vec![ChatChoice {
                message: ReplyMessage {
                    content: None,
                    tool_calls: Some(vec![ToolCall {
                        id: Some("call_1".to_string()),
                        call_type: Some("function".to_string()),
                        function: ToolCallFunction {
                            name: RESUME_TOOL_NAME.to_string(),
                            arguments: arguments.to_string(),
                        },
                    }]),
                },
                finish_reason: Some("tool_calls".to_string()),
            }],
        }
    }

    fn text_reply(content: &str) -> ChatReply {
        ChatReply {
            choices: vec![ChatChoice {
                message: ReplyMessage {
                    content: Some(content.to_string()),
                    tool_calls: None,
                },
                finish_reason: Some("stop".to_string()),
            }],
        }
    }

    fn network_error() -> GenerationError {
        GenerationError::Network("connection reset by peer".to_string())
    }

    fn auth_error() -> GenerationError {
        GenerationError::Gateway {
            status: 401,
            message: "authentication failed — check your API key".to_string(),
        }
    }

    fn base_resume() -> ResumeDocument {
        ResumeDocument {
            name: "Ada Lovelace".to_string(),
            title: "Software Engineer".to_string(),
            summary: "Engineer with systems experience.".to_string(),
            ..ResumeDocument::default()
        }
    }

    fn ingest_request(raw_text: &str) -> IngestRequest {
        IngestRequest {
            raw_text: raw_text.to_string(),
            api_key: "sk-test".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            locale: None,
        }
    }

    fn valid_raw_text() -> String {
        "Ada Lovelace, software engineer. Ten years building compilers and analytical engines."
            .to_string()
    }

    // ── validation short-circuits ──

    #[tokio::test]
    async fn test_too_short_text_fails_without_any_gateway_call() {
        let gateway = MockGateway::new(vec![]);
        let result = ingest_resume(&gateway, &defaults(), ingest_request("too short")).await;

        let failure = result.unwrap_err();
        assert_eq!(failure.error.kind, ErrorKind::Validation);
        assert_eq!(failure.attempts, 0);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_any_gateway_call() {
        let gateway = MockGateway::new(vec![]);
        let mut request = ingest_request(&valid_raw_text());
        request.api_key = "   ".to_string();

        let failure = ingest_resume(&gateway, &defaults(), request).await.unwrap_err();
        assert_eq!(failure.error.kind, ErrorKind::Validation);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_spontaneous_letter_without_company_fails_before_network() {
        let gateway = MockGateway::new(vec![]);
        let request = CoverLetterRequest {
            resume: base_resume(),
            job_position: String::new(),
            job_description: String::new(),
            company_description: String::new(),
            api_key: "sk-test".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            locale: None,
        };

        let failure = generate_cover_letter(&gateway, &defaults(), request)
            .await
            .unwrap_err();
        assert_eq!(failure.error.kind, ErrorKind::Validation);
        assert_eq!(gateway.calls(), 0);
    }

    // ── happy paths ──

    #[tokio::test]
    async fn test_ingest_happy_path_returns_document() {
        let gateway = MockGateway::new(vec![Ok(tool_reply(
            r#"{"name": "Ada Lovelace", "title": "Software Engineer"}"#,
        ))]);

        let document = ingest_resume(&gateway, &defaults(), ingest_request(&valid_raw_text()))
            .await
            .unwrap();
        assert_eq!(document.name, "Ada Lovelace");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_ingest_with_unsupported_locale_still_succeeds() {
        let gateway = MockGateway::new(vec![Ok(tool_reply(
            r#"{"name": "Ada Lovelace", "title": "Engineer"}"#,
        ))]);
        let mut request = ingest_request(&valid_raw_text());
        request.locale = Some("xx".to_string());

        assert!(ingest_resume(&gateway, &defaults(), request).await.is_ok());
        // Falls back to English prompting
        let last = gateway.last_request.lock().unwrap();
        assert!(last.as_ref().unwrap().messages[0].content.contains("English"));
    }

    #[tokio::test]
    async fn test_tailor_merges_delta_over_original() {
        let gateway = MockGateway::new(vec![Ok(tool_reply(
            r#"{
                "name": "Ada Lovelace",
                "title": "Staff Engineer",
                "changes": [{"section": "title", "description": "Promoted headline", "reason": "matches seniority"}]
            }"#,
        ))]);

        let mut original = base_resume();
        original.contact.email = "ada@example.com".to_string();
        let request = TailorRequest {
            resume: original.clone(),
            job_title: "Staff Engineer".to_string(),
            job_description: "Lead our storage team.".to_string(),
            company_description: String::new(),
            instructions: String::new(),
            api_key: "sk-test".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            locale: None,
        };

        let tailored = tailor_resume(&gateway, &defaults(), request).await.unwrap();
        assert_eq!(tailored.title, "Staff Engineer");
        // Fields the delta omitted fall back to the original
        assert_eq!(tailored.summary, original.summary);
        assert_eq!(tailored.contact.email, "ada@example.com");
        assert_eq!(tailored.changes.len(), 1);
    }

    #[tokio::test]
    async fn test_cover_letter_happy_path() {
        let letter = "Dear Hiring Team,\n\nAda Lovelace writes to express interest...\n\nSincerely,\nAda Lovelace";
        let gateway = MockGateway::new(vec![Ok(text_reply(letter))]);
        let request = CoverLetterRequest {
            resume: base_resume(),
            job_position: "Backend Engineer".to_string(),
            job_description: "Own the billing service.".to_string(),
            company_description: String::new(),
            api_key: "sk-test".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            locale: None,
        };

        let result = generate_cover_letter(&gateway, &defaults(), request)
            .await
            .unwrap();
        assert_eq!(result.content, letter);
        assert_eq!(result.inputs.job_position, "Backend Engineer");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_spontaneous_cover_letter_prompt_reaches_the_gateway() {
        let gateway = MockGateway::new(vec![Ok(text_reply(
            "Dear Team, Ada Lovelace would love to join Acme. Sincerely, Ada Lovelace",
        ))]);
        let request = CoverLetterRequest {
            resume: base_resume(),
            job_position: String::new(),
            job_description: String::new(),
            company_description: "Acme Corp makes tools".to_string(),
            api_key: "sk-test".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            locale: Some("en".to_string()),
        };

        assert!(generate_cover_letter(&gateway, &defaults(), request).await.is_ok());
        let last = gateway.last_request.lock().unwrap();
        let user_message = &last.as_ref().unwrap().messages[1].content;
        assert!(user_message.contains("Spontaneous Application"));
        assert!(user_message.contains("Acme Corp makes tools"));
    }

    // ── retry bounds ──

    #[tokio::test(start_paused = true)]
    async fn test_persistent_network_failure_calls_gateway_exactly_four_times() {
        let gateway = MockGateway::new(vec![
            Err(network_error()),
            Err(network_error()),
            Err(network_error()),
            Err(network_error()),
        ]);

        let failure = ingest_resume(&gateway, &defaults(), ingest_request(&valid_raw_text()))
            .await
            .unwrap_err();
        assert_eq!(gateway.calls(), 4);
        assert_eq!(failure.attempts, 4);
        assert_eq!(failure.error.kind, ErrorKind::Network);
        assert!(!failure.error.suggestion.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_calls_gateway_exactly_once() {
        let gateway = MockGateway::new(vec![Err(auth_error())]);

        let failure = ingest_resume(&gateway, &defaults(), ingest_request(&valid_raw_text()))
            .await
            .unwrap_err();
        assert_eq!(gateway.calls(), 1);
        assert_eq!(failure.attempts, 1);
        assert_eq!(failure.error.kind, ErrorKind::Auth);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_tool_call_is_retried_then_succeeds() {
        let gateway = MockGateway::new(vec![
            Ok(text_reply("Here is your CV as text instead of a tool call")),
            Ok(tool_reply(r#"{"name": "Ada Lovelace", "title": "Engineer"}"#)),
        ]);

        let document = ingest_resume(&gateway, &defaults(), ingest_request(&valid_raw_text()))
            .await
            .unwrap();
        assert_eq!(document.name, "Ada Lovelace");
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_name_in_payload_is_not_retried() {
        // "CV must contain a valid name" carries no transient signature
        let gateway = MockGateway::new(vec![Ok(tool_reply(r#"{"name": "", "title": "Engineer"}"#))]);

        let failure = ingest_resume(&gateway, &defaults(), ingest_request(&valid_raw_text()))
            .await
            .unwrap_err();
        assert_eq!(gateway.calls(), 1);
        assert!(failure.error.message.contains("valid name"));
    }

    #[tokio::test]
    async fn test_malformed_arguments_error_names_json() {
        let gateway = MockGateway::new(vec![Ok(tool_reply("{ invalid json response"))]);

        let failure = ingest_resume(&gateway, &defaults(), ingest_request(&valid_raw_text()))
            .await
            .unwrap_err();
        assert!(failure.error.message.contains("parsed as valid JSON"));
    }
}
