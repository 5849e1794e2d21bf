//! Ports - capability seams between the engine and the outside world.

mod client_sink;
mod translator;

pub use client_sink::{ClientSink, RecordingSink};
pub use translator::{TranslationError, Translator};
