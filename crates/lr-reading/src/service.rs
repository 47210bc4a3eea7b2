//! Request handling: from a reading request to a fully assembled response.

use std::sync::{Arc, Mutex, PoisonError};

use lr_core::{DeckResult, Draw, DrawnCard, NoteRepository, Store};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapter::{ReadingAdapter, Translator};
use crate::config::ReaderConfig;
use crate::error::ServiceError;
use crate::language::Language;
use crate::prompt::PromptComposer;
use crate::reading::LocalizedReading;

/// An incoming reading request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRequest {
    /// The question, in the source language.
    #[serde(alias = "question_ko")]
    pub question: String,
    /// Topic such as love, career or finance.
    #[serde(default)]
    pub category: Option<String>,
    /// Spread id.
    pub spread_type: String,
}

impl ReadingRequest {
    /// Create a request without a category.
    pub fn new(question: impl Into<String>, spread_type: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            category: None,
            spread_type: spread_type.into(),
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A drawn card as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPosition {
    /// Card number.
    pub card_id: u32,
    /// Slot key of the position.
    pub position_key: String,
    /// Position label in the primary language.
    pub position_label_primary: String,
    /// Position label in the translated language.
    pub position_label_translated: String,
    /// Grid row, for tableau layouts.
    pub row: Option<u32>,
    /// Grid column, for tableau layouts.
    pub column: Option<u32>,
    /// Card name in the primary language.
    pub name_primary: String,
    /// Card name in the translated language.
    pub name_translated: String,
    /// Card meaning in the primary language.
    pub interpretation_primary: Option<String>,
    /// Card meaning in the translated language.
    pub interpretation_translated: Option<String>,
    /// Reader note for the card.
    pub note: Option<String>,
}

impl From<&DrawnCard<'_>> for CardPosition {
    fn from(drawn: &DrawnCard<'_>) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            card_id: drawn.card.id,
            position_key: drawn.position.slot.clone(),
            position_label_primary: drawn.position.label_en.clone(),
            position_label_translated: drawn.position.label_ko.clone(),
            row: drawn.position.row,
            column: drawn.position.column,
            name_primary: drawn.card.name_en.clone(),
            name_translated: drawn.card.name_ko.clone(),
            interpretation_primary: non_empty(&drawn.card.meaning_en),
            interpretation_translated: non_empty(&drawn.card.meaning_ko),
            note: drawn.note.as_deref().map(str::to_string),
        }
    }
}

/// The assembled reading response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingResponse {
    /// Reading in the primary language, keys suffixed `_en`.
    pub reading_primary: LocalizedReading,
    /// Reading in the translated language, keys suffixed `_ko`.
    pub reading_translated: LocalizedReading,
    /// Drawn cards in position order.
    pub cards: Vec<CardPosition>,
    /// The spread id that was drawn.
    pub spread_type: String,
}

/// Random source for draws.
#[derive(Debug, Default)]
pub enum DrawRng {
    /// The thread-local generator.
    #[default]
    Thread,
    /// One seeded generator shared behind a lock, for reproducible runs.
    Seeded(Mutex<StdRng>),
}

impl DrawRng {
    /// Seeded when a seed is given, thread-local otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
            None => Self::Thread,
        }
    }

    fn draw<'a>(&self, store: &'a Store, spread_id: &str) -> DeckResult<Draw<'a>> {
        match self {
            Self::Thread => store.draw(spread_id, &mut rand::rng()),
            Self::Seeded(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                store.draw(spread_id, &mut *rng)
            }
        }
    }
}

/// Serves reading requests against shared reference data.
///
/// Holds no per-request state; one service can handle concurrent requests.
pub struct ReadingService {
    store: Arc<Store>,
    notes: Arc<NoteRepository>,
    composer: PromptComposer,
    reader: ReadingAdapter,
    translator: Translator,
    rng: DrawRng,
}

impl ReadingService {
    /// Create a service drawing with a thread-local RNG.
    pub fn new(
        store: Arc<Store>,
        notes: Arc<NoteRepository>,
        composer: PromptComposer,
        reader: ReadingAdapter,
        translator: Translator,
    ) -> Self {
        Self {
            store,
            notes,
            composer,
            reader,
            translator,
            rng: DrawRng::Thread,
        }
    }

    /// Load reference data and build a service from configuration.
    ///
    /// Fails if the card or spread tables cannot be loaded; the service must
    /// not start without them.
    pub fn from_config(
        config: &ReaderConfig,
        reader: ReadingAdapter,
        translator: Translator,
    ) -> DeckResult<Self> {
        let store = Store::load(&config.cards_path(), &config.spreads_path())?;
        let notes = NoteRepository::from_path(&config.notes_path())?;
        let composer = PromptComposer::new(config.model.clone()).with_style(config.template);
        info!(
            data_dir = %config.data_dir.display(),
            model = %config.model,
            template = %config.template,
            "reading service ready"
        );
        Ok(
            Self::new(Arc::new(store), Arc::new(notes), composer, reader, translator)
                .with_rng(DrawRng::from_seed(config.seed)),
        )
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: DrawRng) -> Self {
        self.rng = rng;
        self
    }

    /// The reference data.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The note repository.
    pub fn notes(&self) -> &NoteRepository {
        &self.notes
    }

    /// The prompt composer.
    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Draw and annotate cards for a spread.
    pub fn draw(&self, spread_id: &str) -> Result<Draw<'_>, ServiceError> {
        let draw = self.rng.draw(&self.store, spread_id)?;
        Ok(self.notes.annotate(draw))
    }

    /// Build the prompt sent to the reading provider for a draw.
    ///
    /// The question is translated into the primary language first.
    pub async fn compose_prompt(&self, request: &ReadingRequest, draw: &Draw<'_>) -> String {
        let question = self
            .translator
            .translate_to(&request.question, Language::PRIMARY)
            .await;
        let prompt = self.composer.compose(
            &question,
            request.category.as_deref(),
            &request.spread_type,
            draw,
        );
        debug!(spread = %request.spread_type, chars = prompt.len(), "prompt composed");
        prompt
    }

    /// Handle one reading request.
    ///
    /// An unknown spread is reported before anything is drawn. Provider
    /// failures do not fail the request; they degrade the reading instead.
    pub async fn create_reading(
        &self,
        request: ReadingRequest,
    ) -> Result<ReadingResponse, ServiceError> {
        let draw = self.draw(&request.spread_type)?;
        let prompt = self.compose_prompt(&request, &draw).await;

        let primary = self.reader.read(&prompt, &request.spread_type).await;
        let translated = self
            .translator
            .translate_reading(&primary, Language::TRANSLATED)
            .await;

        Ok(ReadingResponse {
            reading_primary: primary.localized(Language::PRIMARY),
            reading_translated: translated.localized(Language::TRANSLATED),
            cards: draw.cards().iter().map(CardPosition::from).collect(),
            spread_type: request.spread_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::adapter::{DraftTranslationProvider, ReadingProvider, TranslationProvider};
    use crate::error::{AdapterError, AdapterResult};
    use crate::prompt::TemplateStyle;
    use crate::reading::Reading;
    use super::*;

    const CARDS: &str = r#"{
        "1": {"name_en": "Rider", "name_ko": "기수", "meaning_en": "News arrives. Fast.", "meaning_ko": "소식."},
        "2": {"name_en": "Clover", "name_ko": "클로버", "meaning_en": "Small luck."},
        "3": {"name_en": "Ship", "name_ko": "배", "meaning_en": "Travel."},
        "4": {"name_en": "House", "name_ko": "집", "meaning_en": "Home."}
    }"#;

    const SPREADS: &str = r#"{"spreads": {
        "single_card_yes_no": {"card_count": 1,
            "positions": [{"slot": "answer", "label_en": "Answer", "label_ko": "답"}]},
        "past_present_future": {"card_count": 3, "positions": [
            {"slot": "past", "label_en": "Past", "label_ko": "과거"},
            {"slot": "present", "label_en": "Present", "label_ko": "현재"},
            {"slot": "future", "label_en": "Future", "label_ko": "미래"}]},
        "grand": {"card_count": 5, "positions": [
            {"slot": "a"}, {"slot": "b"}, {"slot": "c"}, {"slot": "d"}, {"slot": "e"}]}
    }}"#;

    const NOTES: &str = "<rider>Read the next card.</rider>\n<ship>Distance.</ship>";

    /// Returns a fixed answer and remembers every prompt it was given.
    #[derive(Default)]
    struct Recording {
        answer: String,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ReadingProvider for Recording {
        async fn generate(&self, prompt: &str, _spread_id: &str) -> AdapterResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    struct Down;

    #[async_trait]
    impl ReadingProvider for Down {
        async fn generate(&self, _prompt: &str, _spread_id: &str) -> AdapterResult<String> {
            Err(AdapterError::Transport("timeout".into()))
        }
    }

    #[async_trait]
    impl TranslationProvider for Down {
        async fn translate(&self, _text: &str, _target: Language) -> AdapterResult<String> {
            Err(AdapterError::Transport("timeout".into()))
        }
    }

    fn service_with(reader: ReadingAdapter, translator: Translator) -> ReadingService {
        let store = Store::from_json(CARDS, SPREADS).unwrap();
        ReadingService::new(
            Arc::new(store),
            Arc::new(NoteRepository::new(NOTES)),
            PromptComposer::new("test-model").with_style(TemplateStyle::Basic),
            reader,
            translator,
        )
        .with_rng(DrawRng::from_seed(Some(11)))
    }

    fn recording(answer: &str) -> (ReadingAdapter, Arc<Mutex<Vec<String>>>) {
        let provider = Recording {
            answer: answer.to_string(),
            ..Recording::default()
        };
        let prompts = Arc::clone(&provider.prompts);
        (ReadingAdapter::new(provider), prompts)
    }

    const ANSWER: &str = r#"{"summary_en":"x","overall_story_en":"y","action_items_en":["a","b"]}"#;

    #[tokio::test]
    async fn single_card_yes_no_end_to_end() {
        let (reader, prompts) = recording(ANSWER);
        let service = service_with(reader, Translator::new(DraftTranslationProvider));

        let response = service
            .create_reading(ReadingRequest::new("갈까요?", "single_card_yes_no"))
            .await
            .unwrap();

        assert_eq!(response.cards.len(), 1);
        assert_eq!(response.spread_type, "single_card_yes_no");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("single-card YES/NO"));
        assert!(prompts[0].contains("Question: 갈까요? [en draft]\n"));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value["reading_primary"],
            json!({"summary_en": "x", "overall_story_en": "y", "action_items_en": ["a", "b"]})
        );
        assert_eq!(
            value["reading_translated"],
            json!({
                "summary_ko": "x [ko draft]",
                "overall_story_ko": "y [ko draft]",
                "action_items_ko": ["a [ko draft]", "b [ko draft]"]
            })
        );
    }

    #[tokio::test]
    async fn past_present_future_end_to_end() {
        let (reader, prompts) = recording(ANSWER);
        let service = service_with(reader, Translator::new(DraftTranslationProvider));

        let response = service
            .create_reading(ReadingRequest::new("q", "past_present_future").with_category("love"))
            .await
            .unwrap();

        let keys: Vec<&str> = response.cards.iter().map(|c| c.position_key.as_str()).collect();
        assert_eq!(keys, ["past", "present", "future"]);
        let ids: HashSet<u32> = response.cards.iter().map(|c| c.card_id).collect();
        assert_eq!(ids.len(), 3);

        let prompts = prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.contains("Category: love\n"));
        let at = |label: &str| prompt.find(&format!("\n{label}: ")).unwrap();
        assert!(at("Past") < at("Present") && at("Present") < at("Future"));
        assert!(prompt.contains("narrative-style"));
    }

    #[tokio::test]
    async fn cards_carry_labels_names_and_notes() {
        let (reader, _) = recording(ANSWER);
        let service = service_with(reader, Translator::new(DraftTranslationProvider));
        let response = service
            .create_reading(ReadingRequest::new("q", "past_present_future"))
            .await
            .unwrap();

        for card in &response.cards {
            let source = service.store().deck().get(card.card_id).unwrap();
            assert_eq!(card.name_primary, source.name_en);
            assert_eq!(card.name_translated, source.name_ko);
            match source.name_en.as_str() {
                "Rider" => assert_eq!(card.note.as_deref(), Some("Read the next card.")),
                "Ship" => assert_eq!(card.note.as_deref(), Some("Distance.")),
                _ => assert!(card.note.is_none()),
            }
            if source.meaning_ko.is_empty() {
                assert!(card.interpretation_translated.is_none());
            }
        }
        assert_eq!(response.cards[0].position_label_translated, "과거");
    }

    #[tokio::test]
    async fn unknown_spread_is_not_found() {
        let (reader, prompts) = recording(ANSWER);
        let service = service_with(reader, Translator::new(DraftTranslationProvider));

        let err = service
            .create_reading(ReadingRequest::new("q", "celtic_cross"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownSpread(ref id) if id == "celtic_cross"));
        assert_eq!(err.status_code(), 404);
        assert!(prompts.lock().unwrap().is_empty());
        assert_eq!(service.notes().scan_count(), 0);
    }

    #[tokio::test]
    async fn insufficient_deck_is_reported() {
        let (reader, _) = recording(ANSWER);
        let service = service_with(reader, Translator::new(DraftTranslationProvider));
        let err = service
            .create_reading(ReadingRequest::new("q", "grand"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[tokio::test]
    async fn malformed_reading_still_succeeds() {
        for answer in ["not json at all", "```json\n{\"summary_en\": \"x\"\n```"] {
            let (reader, _) = recording(answer);
            let service = service_with(reader, Translator::new(DraftTranslationProvider));
            let response = service
                .create_reading(ReadingRequest::new("q", "past_present_future"))
                .await
                .unwrap();
            assert_eq!(response.reading_primary.reading, Reading::fallback());
            assert_eq!(response.cards.len(), 3);
        }
    }

    #[tokio::test]
    async fn provider_outages_degrade() {
        let service = service_with(ReadingAdapter::new(Down), Translator::new(Down));
        let response = service
            .create_reading(ReadingRequest::new("q", "single_card_yes_no"))
            .await
            .unwrap();
        assert!(response.reading_primary.reading.is_fallback());
        assert_eq!(
            response.reading_translated.reading,
            response.reading_primary.reading
        );
        assert_eq!(response.reading_translated.language, Language::Ko);
    }

    #[tokio::test]
    async fn concurrent_requests_share_the_service() {
        let (reader, prompts) = recording(ANSWER);
        let service = Arc::new(
            service_with(reader, Translator::new(DraftTranslationProvider))
                .with_rng(DrawRng::Thread),
        );

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .create_reading(ReadingRequest::new("q", "past_present_future"))
                        .await
                })
            })
            .collect();

        for handle in handles {
            let response = handle.await.unwrap().unwrap();
            assert_eq!(response.cards.len(), 3);
        }
        assert_eq!(prompts.lock().unwrap().len(), 16);
        assert!(service.notes().scan_count() >= 3);
    }

    #[test]
    fn request_accepts_source_language_alias() {
        let request: ReadingRequest =
            serde_json::from_str(r#"{"question_ko": "질문", "spread_type": "nine_box"}"#).unwrap();
        assert_eq!(request.question, "질문");
        assert!(request.category.is_none());
    }

    #[tokio::test]
    async fn composed_prompt_matches_what_the_reader_receives() {
        let request = ReadingRequest::new("q", "past_present_future").with_category("work");

        // Both services start from the same seed, so they draw the same cards.
        let (reader, _) = recording(ANSWER);
        let preview = service_with(reader, Translator::new(DraftTranslationProvider));
        let draw = preview.draw(&request.spread_type).unwrap();
        let shown = preview.compose_prompt(&request, &draw).await;
        assert!(shown.contains("Question: q [en draft]\n"));
        assert!(shown.contains("Category: work\n"));

        let (reader, sent) = recording(ANSWER);
        let service = service_with(reader, Translator::new(DraftTranslationProvider));
        service.create_reading(request).await.unwrap();
        assert_eq!(sent.lock().unwrap()[0], shown);
    }

    #[test]
    fn seeded_draws_repeat() {
        let ids = |seed| {
            let (reader, _) = recording(ANSWER);
            let service = service_with(reader, Translator::new(DraftTranslationProvider))
                .with_rng(DrawRng::from_seed(Some(seed)));
            service.draw("past_present_future").unwrap().card_ids()
        };
        assert_eq!(ids(5), ids(5));
    }

    #[test]
    fn from_config_requires_reference_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReaderConfig::default().with_data_dir(dir.path());
        let result = ReadingService::from_config(
            &config,
            ReadingAdapter::new(Down),
            Translator::new(Down),
        );
        assert!(matches!(result, Err(ref e) if e.is_configuration()));
    }

    #[test]
    fn from_config_loads_shipped_data() {
        let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let config = ReaderConfig::default().with_data_dir(data).with_seed(1);
        let service = ReadingService::from_config(
            &config,
            ReadingAdapter::new(Down),
            Translator::new(Down),
        )
        .unwrap();
        assert_eq!(service.store().deck().len(), 36);
        assert_eq!(service.composer().style(), TemplateStyle::Structured);
        assert!(!service.notes().is_empty());
    }
}
