//! Translation request validation.

use crate::error::TranslationError;

/// Longest accepted input, counted in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Rejection message for missing or blank text.
pub const TEXT_REQUIRED: &str = "Text is required and must be a string";

/// Rejection message for a missing target language.
pub const TARGET_REQUIRED: &str = "Target language is required";

/// Rejection message for oversized text.
pub const TEXT_TOO_LONG: &str = "Text is too long (max 5000 characters)";

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    target_lang: String,
}

impl TranslationRequest {
    /// Validates raw request fields.
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::Validation` when the text is missing or
    /// blank, the target language is missing or blank, or the text is longer
    /// than [`MAX_TEXT_CHARS`].
    pub fn new(text: Option<String>, target_lang: Option<String>) -> Result<Self, TranslationError> {
        let text = text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TranslationError::Validation(TEXT_REQUIRED.into()))?;
        let target_lang = target_lang
            .map(|l| l.trim().to_owned())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| TranslationError::Validation(TARGET_REQUIRED.into()))?;
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(TranslationError::Validation(TEXT_TOO_LONG.into()));
        }
        Ok(Self { text, target_lang })
    }

    /// The text to translate, exactly as submitted.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The target language code.
    #[must_use]
    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(text: Option<&str>, lang: Option<&str>) -> String {
        match TranslationRequest::new(text.map(String::from), lang.map(String::from)) {
            Err(TranslationError::Validation(message)) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_text_at_the_limit() {
        let text = "a".repeat(MAX_TEXT_CHARS);

        let request = TranslationRequest::new(Some(text), Some("es".into())).unwrap();

        assert_eq!(request.target_lang(), "es");
        assert_eq!(request.text().len(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_rejects_text_over_the_limit() {
        let text = "a".repeat(MAX_TEXT_CHARS + 1);

        assert_eq!(validation_message(Some(&text), Some("es")), TEXT_TOO_LONG);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_TEXT_CHARS);

        assert!(TranslationRequest::new(Some(text), Some("fr".into())).is_ok());
    }

    #[test]
    fn test_rejects_missing_or_blank_text() {
        assert_eq!(validation_message(None, Some("es")), TEXT_REQUIRED);
        assert_eq!(validation_message(Some("   "), Some("es")), TEXT_REQUIRED);
    }

    #[test]
    fn test_rejects_missing_target() {
        assert_eq!(validation_message(Some("hola"), None), TARGET_REQUIRED);
        assert_eq!(validation_message(Some("hola"), Some("")), TARGET_REQUIRED);
    }
}
