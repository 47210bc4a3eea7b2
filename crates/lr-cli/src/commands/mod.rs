pub mod cards;
pub mod draw;
pub mod prompt;
pub mod read;
pub mod spreads;

use std::path::PathBuf;

use lr_core::Store;
use lr_reading::{
    DraftReadingProvider, DraftTranslationProvider, ReaderConfig, ReadingAdapter, ReadingService,
    TemplateStyle, Translator,
};
use tokio::runtime::Runtime;
use tracing::debug;

/// Global options shared by every subcommand.
pub struct Options {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub template: Option<TemplateStyle>,
}

impl Options {
    /// Resolve the configuration: file first, then command line overrides.
    fn resolve(&self, seed: Option<u64>) -> Result<ReaderConfig, String> {
        let mut config = match &self.config {
            Some(path) => ReaderConfig::load(path).map_err(|e| e.to_string())?,
            None => ReaderConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(template) = self.template {
            config = config.with_template(template);
        }
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        debug!(
            data_dir = %config.data_dir.display(),
            model = %config.model,
            template = %config.template,
            seed = ?config.seed,
            "configuration resolved"
        );
        Ok(config)
    }
}

/// Load the card and spread tables.
fn load_store(config: &ReaderConfig) -> Result<Store, String> {
    Store::load(&config.cards_path(), &config.spreads_path()).map_err(|e| e.to_string())
}

/// Build a reading service backed by the draft providers.
fn build_service(config: &ReaderConfig) -> Result<ReadingService, String> {
    ReadingService::from_config(
        config,
        ReadingAdapter::new(DraftReadingProvider),
        Translator::new(DraftTranslationProvider),
    )
    .map_err(|e| e.to_string())
}

/// Single-threaded runtime for the async reading pipeline.
fn runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))
}

/// Shorten text to `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else if text.is_empty() {
        "—".to_string()
    } else {
        text.to_string()
    }
}
