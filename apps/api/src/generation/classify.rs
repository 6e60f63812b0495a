//! Error classification — normalizes any pipeline failure into
//! `{kind, retryable, suggestion, message}`.
//!
//! Classification is substring matching against the error message. That is
//! a heuristic, not a type-safe contract, so the rules live in one ordered
//! table where the precedence is explicit and unit-testable. First match
//! wins. Validation errors are classified structurally (they never reach
//! the table) because their messages legitimately mention things like
//! "model" that would otherwise match earlier rows.

use serde::Serialize;
use thiserror::Error;

use crate::errors::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Auth,
    Quota,
    Network,
    Ai,
    Unknown,
}

/// Ordered classification table. Matching is case-insensitive; earlier rows
/// win.
const CLASSIFICATION_RULES: &[(&[&str], ErrorKind)] = &[
    (&["api key", "unauthorized", "authentication"], ErrorKind::Auth),
    (&["rate limit", "quota", "credits", "insufficient"], ErrorKind::Quota),
    (&["network", "connection", "timeout"], ErrorKind::Network),
    (&["model", "not found", "unavailable"], ErrorKind::Ai),
    (&["validation", "required"], ErrorKind::Validation),
];

/// Signatures that make an otherwise-unknown error worth retrying.
const TRANSIENT_PATTERNS: &[&str] = &[
    "timeout",
    "temporary",
    "try again",
    "500",
    "502",
    "503",
    "504",
];

impl ErrorKind {
    /// Whether this kind is retried by the backoff controller. `quota` is
    /// deliberately never retried — hammering a rate-limited or
    /// out-of-credits account only makes things worse.
    pub fn retryable(self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Ai)
    }

    pub fn suggestion(self) -> &'static str {
        match self {
            ErrorKind::Validation => "Review the highlighted input and submit again.",
            ErrorKind::Auth => "Check that your API key is correct and still active.",
            ErrorKind::Quota => {
                "Switch to a free or cheaper model, or check your account balance."
            }
            ErrorKind::Network => "Check your connection; the request will be retried.",
            ErrorKind::Ai => {
                "The model may be unavailable — retrying, or pick a different model."
            }
            ErrorKind::Unknown => "Try again; if the problem persists, check the server logs.",
        }
    }
}

/// A failure normalized for the caller: kind, retryability, a canned
/// remediation suggestion, and the human-readable message.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub retryable: bool,
    pub suggestion: String,
    pub message: String,
}

/// Classifies a pipeline error. The raw error is consumed here — callers
/// only ever see the classified form.
pub fn classify(error: &GenerationError) -> ClassifiedError {
    let message = error.to_string();

    // Structural fast path: our own validation rejections are always
    // `validation`, whatever their wording.
    if matches!(error, GenerationError::Validation(_)) {
        return build(ErrorKind::Validation, false, message);
    }

    classify_message(message)
}

/// Table-driven classification of an arbitrary message. Also used for
/// failures that arrive as plain text (e.g. provider error bodies).
pub fn classify_message(message: String) -> ClassifiedError {
    let lower = message.to_lowercase();

    for (patterns, kind) in CLASSIFICATION_RULES {
        if patterns.iter().any(|p| lower.contains(p)) {
            return build(*kind, kind.retryable(), message);
        }
    }

    let transient = TRANSIENT_PATTERNS.iter().any(|p| lower.contains(p));
    build(ErrorKind::Unknown, transient, message)
}

fn build(kind: ErrorKind, retryable: bool, message: String) -> ClassifiedError {
    ClassifiedError {
        kind,
        retryable,
        suggestion: kind.suggestion().to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(message: &str) -> (ErrorKind, bool) {
        let c = classify_message(message.to_string());
        (c.kind, c.retryable)
    }

    #[test]
    fn test_auth_signals_are_not_retryable() {
        assert_eq!(kind_of("Invalid API key provided"), (ErrorKind::Auth, false));
        assert_eq!(kind_of("401 Unauthorized"), (ErrorKind::Auth, false));
        assert_eq!(
            kind_of("authentication failed for this token"),
            (ErrorKind::Auth, false)
        );
    }

    #[test]
    fn test_quota_signals_are_never_retryable() {
        assert_eq!(kind_of("Rate limit exceeded"), (ErrorKind::Quota, false));
        assert_eq!(kind_of("monthly quota reached"), (ErrorKind::Quota, false));
        assert_eq!(kind_of("Insufficient credits"), (ErrorKind::Quota, false));
    }

    #[test]
    fn test_network_signals_are_retryable() {
        assert_eq!(kind_of("network error: connection reset"), (ErrorKind::Network, true));
        assert_eq!(kind_of("request timeout after 120s"), (ErrorKind::Network, true));
    }

    #[test]
    fn test_ai_signals_are_retryable() {
        assert_eq!(kind_of("model overloaded"), (ErrorKind::Ai, true));
        assert_eq!(
            kind_of("The requested resource was not found"),
            (ErrorKind::Ai, true)
        );
        assert_eq!(kind_of("service temporarily unavailable"), (ErrorKind::Ai, true));
    }

    #[test]
    fn test_validation_patterns_match_last() {
        assert_eq!(kind_of("field is required"), (ErrorKind::Validation, false));
    }

    #[test]
    fn test_precedence_auth_beats_quota() {
        // "api key" appears before "credits" in the table, and wins.
        let (kind, _) = kind_of("api key has insufficient credits");
        assert_eq!(kind, ErrorKind::Auth);
    }

    #[test]
    fn test_precedence_quota_beats_network() {
        let (kind, retryable) = kind_of("rate limit hit, connection dropped");
        assert_eq!(kind, ErrorKind::Quota);
        assert!(!retryable);
    }

    #[test]
    fn test_unknown_transient_is_retryable() {
        assert_eq!(kind_of("HTTP 503 from upstream"), (ErrorKind::Unknown, true));
        assert_eq!(
            kind_of("something temporary went wrong"),
            (ErrorKind::Unknown, true)
        );
        assert_eq!(kind_of("please try again later"), (ErrorKind::Unknown, true));
    }

    #[test]
    fn test_unknown_without_transient_signature_is_surfaced_immediately() {
        let c = classify_message("entirely mysterious failure".to_string());
        assert_eq!(c.kind, ErrorKind::Unknown);
        assert!(!c.retryable);
    }

    #[test]
    fn test_validation_variant_bypasses_the_table() {
        // The message mentions "model", which would otherwise classify as ai.
        let err = GenerationError::Validation("a completion model id is required".to_string());
        let c = classify(&err);
        assert_eq!(c.kind, ErrorKind::Validation);
        assert!(!c.retryable);
    }

    #[test]
    fn test_gateway_500_classifies_as_transient_unknown() {
        let err = GenerationError::Gateway {
            status: 500,
            message: "the provider reported a server fault".to_string(),
        };
        let c = classify(&err);
        assert_eq!(c.kind, ErrorKind::Unknown);
        assert!(c.retryable, "5xx status digits should match the transient list");
    }

    #[test]
    fn test_missing_tool_call_classifies_as_ai() {
        let c = classify(&GenerationError::MissingToolCall);
        assert_eq!(c.kind, ErrorKind::Ai);
        assert!(c.retryable);
    }

    #[test]
    fn test_every_kind_has_a_suggestion() {
        for kind in [
            ErrorKind::Validation,
            ErrorKind::Auth,
            ErrorKind::Quota,
            ErrorKind::Network,
            ErrorKind::Ai,
            ErrorKind::Unknown,
        ] {
            assert!(!kind.suggestion().is_empty());
        }
    }
}
