//! Pass-through translator for running without provider credentials.

use async_trait::async_trait;

use crate::ports::{TranslationError, Translator};

/// Translator that returns the input unchanged.
///
/// Selected at startup when no API key is configured, so the service comes
/// up and relays messages untranslated instead of crashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, TranslationError> {
        Ok(text.to_string())
    }
}
