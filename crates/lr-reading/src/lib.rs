//! Reading pipeline for the Lenormand reader.
//!
//! Turns a draw into a prompt, sends it to a generative-text provider,
//! parses the structured reading that comes back, and translates it. Provider
//! failures never reach the caller: the reading degrades to a fixed fallback
//! and translation degrades to the untranslated text.

pub mod adapter;
pub mod config;
pub mod error;
pub mod language;
pub mod prompt;
pub mod reading;
pub mod service;

pub use adapter::{
    DraftReadingProvider, DraftTranslationProvider, ReadingAdapter, ReadingProvider,
    TranslationProvider, Translator,
};
pub use config::ReaderConfig;
pub use error::{AdapterError, AdapterResult, ConfigError, ConfigResult, ServiceError};
pub use language::Language;
pub use prompt::{PromptComposer, TemplateKind, TemplateStyle};
pub use reading::{LocalizedReading, Reading, parse_reading};
pub use service::{CardPosition, DrawRng, ReadingRequest, ReadingResponse, ReadingService};
