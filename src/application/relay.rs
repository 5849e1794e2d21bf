//! Best-effort translation relay.
//!
//! Sits on the critical path of every message, so it never fails outward:
//! a provider error is logged and the original text is delivered untouched.
//! Message delivery must not depend on the translation provider being up.

use std::sync::Arc;

use crate::ports::Translator;

/// Never-failing wrapper around the [`Translator`] port.
pub struct TranslationRelay {
    translator: Arc<dyn Translator>,
}

impl TranslationRelay {
    /// Creates a relay over the given translator.
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Translates `text` from `source` to `target`, falling back to the
    /// original text on any provider failure.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        match self.translator.translate(text, source, target).await {
            Ok(translated) => translated,
            Err(error) => {
                tracing::warn!(%source, %target, %error, "translation failed, relaying original text");
                text.to_string()
            }
        }
    }
}
