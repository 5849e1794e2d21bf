//! Mock translator for testing.
//!
//! Configurable to return scripted translations or inject provider errors,
//! and records every call for verification, so the router's behavior under
//! provider failure is exercised without network access.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{TranslationError, Translator};

/// Scripted translator test double.
///
/// Responses are consumed in order; once the script is exhausted, calls
/// echo the input unchanged.
#[derive(Debug, Clone, Default)]
pub struct MockTranslator {
    responses: Arc<Mutex<VecDeque<Result<String, TranslationError>>>>,
    calls: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockTranslator {
    /// Creates a mock with an empty script (echoes input).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful translation.
    pub fn with_response(self, translated: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(translated.into()));
        self
    }

    /// Queues a provider failure.
    pub fn with_failure(self, error: TranslationError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Returns every (text, source, target) call made so far, in order.
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));

        match self.responses.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let mock = MockTranslator::new()
            .with_response("hola")
            .with_failure(TranslationError::AuthenticationFailed);

        assert_eq!(mock.translate("hello", "en", "es").await.unwrap(), "hola");
        assert!(mock.translate("hello", "en", "es").await.is_err());
        // Script exhausted: echo.
        assert_eq!(mock.translate("hello", "en", "es").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let mock = MockTranslator::new();
        mock.translate("hi", "en", "fr").await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![("hi".to_string(), "en".to_string(), "fr".to_string())]
        );
    }
}
