//! Translation of free-text street fields for display.
//!
//! Translation only ever affects description strings. Resolution and
//! radius filtering never depend on it, and a failed translation falls
//! back to the original text.

use around_me_amenity_models::sentinel::is_missing;

/// A translation backend failed.
#[derive(Debug, thiserror::Error)]
#[error("Translation to '{target_language}' failed: {message}")]
pub struct TranslateError {
    /// Requested language.
    pub target_language: String,
    /// Backend-specific reason.
    pub message: String,
}

/// Translates text into a target language.
pub trait Translator {
    /// Translates `text` into `target_language`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError`] if the backend cannot translate.
    fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}

/// Returns text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _target_language: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// Translates `text`, keeping it unchanged if it is missing or the
/// translator fails.
pub fn translate_or_keep(translator: &dyn Translator, text: &str, target_language: &str) -> String {
    if is_missing(text) {
        return text.to_string();
    }
    match translator.translate(text, target_language) {
        Ok(translated) => translated,
        Err(e) => {
            log::warn!("{e}; keeping original text");
            text.to_string()
        }
    }
}
