//! Boundaries to the generative-text and translation providers.
//!
//! Providers are opaque: text in, text out, may fail. The wrappers here turn
//! provider failures into degraded output so a request always completes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::AdapterResult;
use crate::language::Language;
use crate::reading::{Reading, parse_reading};

/// A generative-text provider that answers a composed prompt.
#[async_trait]
pub trait ReadingProvider: Send + Sync {
    /// Send the prompt and return the raw response text.
    async fn generate(&self, prompt: &str, spread_id: &str) -> AdapterResult<String>;
}

/// A machine translation provider.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate `text` into `target`.
    async fn translate(&self, text: &str, target: Language) -> AdapterResult<String>;
}

/// Calls a [`ReadingProvider`] and parses its answer into a [`Reading`].
#[derive(Clone)]
pub struct ReadingAdapter {
    provider: Arc<dyn ReadingProvider>,
}

impl ReadingAdapter {
    /// Wrap a provider.
    pub fn new(provider: impl ReadingProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Generate a reading. Never fails: transport errors and unparseable
    /// output both yield [`Reading::fallback`].
    pub async fn read(&self, prompt: &str, spread_id: &str) -> Reading {
        let raw = match self.provider.generate(prompt, spread_id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(spread = spread_id, error = %e, "reading provider failed, using fallback");
                return Reading::fallback();
            }
        };

        match parse_reading(&raw) {
            Ok(reading) => reading,
            Err(e) => {
                warn!(spread = spread_id, error = %e, "reading response unusable, using fallback");
                Reading::fallback()
            }
        }
    }
}

/// Calls a [`TranslationProvider`], falling back to the source text.
#[derive(Clone)]
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
}

impl Translator {
    /// Wrap a provider.
    pub fn new(provider: impl TranslationProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Translate into the language named by `target`.
    ///
    /// Empty input gives empty output. An unsupported target or a provider
    /// failure returns the input unchanged.
    pub async fn translate(&self, text: &str, target: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        match Language::parse(target) {
            Some(language) => self.translate_to(text, language).await,
            None => {
                debug!(requested = target, "unsupported translation target, leaving text as is");
                text.to_string()
            }
        }
    }

    /// Translate into a known language, with the same degradation rules as
    /// [`Translator::translate`].
    pub async fn translate_to(&self, text: &str, target: Language) -> String {
        if text.is_empty() {
            return String::new();
        }
        match self.provider.translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(language = %target, error = %e, "translation failed, keeping source text");
                text.to_string()
            }
        }
    }

    /// Translate every field of a reading, keeping its shape.
    pub async fn translate_reading(&self, reading: &Reading, target: Language) -> Reading {
        let mut action_items = Vec::with_capacity(reading.action_items.len());
        for item in &reading.action_items {
            action_items.push(self.translate_to(item, target).await);
        }
        Reading {
            summary: self.translate_to(&reading.summary, target).await,
            overall_story: self.translate_to(&reading.overall_story, target).await,
            action_items,
        }
    }
}

/// Placeholder reading provider that returns a draft reading for the spread.
///
/// Stands in for a real model until one is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftReadingProvider;

#[async_trait]
impl ReadingProvider for DraftReadingProvider {
    async fn generate(&self, prompt: &str, spread_id: &str) -> AdapterResult<String> {
        let draft = json!({
            "summary_en": format!("Draft reading for spread '{spread_id}'."),
            "overall_story_en": "This is a placeholder overall story based on the shuffled cards.",
            "action_items_en": [
                "Reflect on the main theme highlighted in the cards.",
                "Identify one practical step to move forward.",
                "Revisit the reading after a few days to notice shifts.",
            ],
            "prompt_used": prompt,
        });
        Ok(draft.to_string())
    }
}

/// Placeholder translation provider that marks text as a draft translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftTranslationProvider;

#[async_trait]
impl TranslationProvider for DraftTranslationProvider {
    async fn translate(&self, text: &str, target: Language) -> AdapterResult<String> {
        Ok(format!("{text} [{target} draft]"))
    }
}
