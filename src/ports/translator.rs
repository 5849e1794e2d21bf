//! Translator port - interface to the external text-translation provider.
//!
//! Implementations convert text between two declared language codes. The
//! engine never calls this directly: the [`TranslationRelay`] wraps it and
//! downgrades every failure to pass-through, so translation stays a
//! best-effort enhancement rather than a correctness requirement.
//!
//! [`TranslationRelay`]: crate::application::TranslationRelay

use async_trait::async_trait;

/// Port for text translation between two language codes.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` from `source` to `target` language (short codes).
    ///
    /// Implementations resolve unknown codes to a fallback pair rather than
    /// rejecting the request.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError>;
}

/// Translation provider errors.
///
/// Internal only: never surfaced to clients. The relay logs these and
/// substitutes the original text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslationError {
    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider returned a server error or is unreachable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_error_displays_correctly() {
        assert_eq!(
            TranslationError::Unavailable("server error 503".to_string()).to_string(),
            "provider unavailable: server error 503"
        );
        assert_eq!(
            TranslationError::AuthenticationFailed.to_string(),
            "authentication failed"
        );
    }
}
