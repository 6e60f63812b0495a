//! Locale resolution — maps a requested locale to the prompt language.
//!
//! Unsupported locales degrade to English with a warning. An unknown locale
//! is never a hard error: the caller still gets a usable document, just in
//! the default language.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Locales the prompt composer can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Pt,
}

impl Locale {
    /// Resolves a requested locale code, falling back to English (with a
    /// single warning) for anything outside the supported set.
    pub fn resolve(requested: &str) -> Locale {
        match requested.trim().to_lowercase().as_str() {
            "" | "en" => Locale::En,
            "fr" => Locale::Fr,
            "pt" => Locale::Pt,
            other => {
                warn!("Unsupported locale '{other}' — falling back to English");
                Locale::En
            }
        }
    }

    /// Resolves an optional locale; absence means the default, no warning.
    pub fn resolve_or_default(requested: Option<&str>) -> Locale {
        match requested {
            Some(code) => Locale::resolve(code),
            None => Locale::default(),
        }
    }

    /// Display name used inside prompts ("write the letter in French").
    pub fn language_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "French",
            Locale::Pt => "Portuguese",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Pt => "pt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_locales() {
        assert_eq!(Locale::resolve("en"), Locale::En);
        assert_eq!(Locale::resolve("fr"), Locale::Fr);
        assert_eq!(Locale::resolve("pt"), Locale::Pt);
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_trims() {
        assert_eq!(Locale::resolve(" FR "), Locale::Fr);
        assert_eq!(Locale::resolve("Pt"), Locale::Pt);
    }

    #[test]
    fn test_unsupported_locale_falls_back_to_english() {
        assert_eq!(Locale::resolve("xx"), Locale::En);
        assert_eq!(Locale::resolve("de"), Locale::En);
    }

    #[test]
    fn test_resolve_or_default() {
        assert_eq!(Locale::resolve_or_default(None), Locale::En);
        assert_eq!(Locale::resolve_or_default(Some("pt")), Locale::Pt);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(Locale::En.language_name(), "English");
        assert_eq!(Locale::Fr.language_name(), "French");
        assert_eq!(Locale::Pt.language_name(), "Portuguese");
    }

    #[test]
    fn test_serde_codes_round_trip() {
        let locale: Locale = serde_json::from_str(r#""fr""#).unwrap();
        assert_eq!(locale, Locale::Fr);
        assert_eq!(serde_json::to_string(&Locale::Pt).unwrap(), r#""pt""#);
    }
}
