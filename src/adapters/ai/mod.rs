//! Translator adapters.
//!
//! - [`GroqTranslator`] - live provider over Groq's OpenAI-compatible API
//! - [`PassthroughTranslator`] - no-op, used when no API key is configured
//! - [`MockTranslator`] - scripted responses and error injection for tests

mod groq_translator;
mod mock_translator;
mod passthrough;

pub use groq_translator::{GroqConfig, GroqTranslator};
pub use mock_translator::MockTranslator;
pub use passthrough::PassthroughTranslator;
