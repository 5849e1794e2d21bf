//! Language-code resolution for translation prompts.
//!
//! Participants declare languages as short codes (`"en"`, `"ar"`, ...). The
//! translation provider is prompted with full language names, so the codes
//! are resolved through this table. Unknown codes fall back to the default
//! pair rather than rejecting the request.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fallback when a source language code is not recognized.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";

/// Fallback when a target language code is not recognized.
pub const DEFAULT_TARGET_LANGUAGE: &str = "Arabic";

static LANGUAGE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "English"),
        ("ar", "Arabic"),
        ("ur", "Urdu"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("zh", "Chinese (Simplified)"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("hi", "Hindi"),
        ("tr", "Turkish"),
        ("nl", "Dutch"),
        ("pl", "Polish"),
        ("sv", "Swedish"),
        ("fi", "Finnish"),
        ("da", "Danish"),
        ("no", "Norwegian"),
        ("cs", "Czech"),
    ])
});

/// Resolves a language code to its full name, if known.
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGE_NAMES.get(code).copied()
}
