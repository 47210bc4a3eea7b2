//! Reader notes keyed by card name.
//!
//! The corpus is free text with blocks like `<rider> ... </rider>`. A note is
//! the text between the opening and closing tag for a card's English name,
//! matched case-insensitively and across line breaks.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::draw::Draw;
use crate::error::{DeckError, DeckResult};

/// Tag-delimited note corpus with a read-through lookup cache.
///
/// Both hits and misses are remembered, so each normalized name scans the
/// corpus at most once unless two threads race on the same first lookup.
#[derive(Debug, Default)]
pub struct NoteRepository {
    corpus: String,
    cache: DashMap<String, Option<Arc<str>>>,
    scans: AtomicUsize,
}

impl NoteRepository {
    /// Create a repository over raw corpus text.
    pub fn new(corpus: impl Into<String>) -> Self {
        Self {
            corpus: corpus.into(),
            ..Self::default()
        }
    }

    /// Read the corpus from a file. A missing file yields an empty corpus.
    pub fn from_path(path: &Path) -> DeckResult<Self> {
        match fs::read_to_string(path) {
            Ok(corpus) => {
                debug!(path = %path.display(), bytes = corpus.len(), "note corpus loaded");
                Ok(Self::new(corpus))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "note corpus not found, cards will carry no notes");
                Ok(Self::default())
            }
            Err(source) => Err(DeckError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Returns true if there is no corpus text.
    pub fn is_empty(&self) -> bool {
        self.corpus.trim().is_empty()
    }

    /// Look up the note for a card name.
    ///
    /// Repeated lookups of the same name return the same `Arc`.
    pub fn lookup(&self, name: &str) -> Option<Arc<str>> {
        let key = note_key(name);
        if key.is_empty() || self.is_empty() {
            return None;
        }
        if let Some(hit) = self.cache.get(&key) {
            return hit.value().clone();
        }

        let found = self.scan(&key);
        self.cache.entry(key).or_insert(found).value().clone()
    }

    /// Number of times the corpus has been scanned.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    /// Attach notes to every card in a draw.
    pub fn annotate<'a>(&self, draw: Draw<'a>) -> Draw<'a> {
        draw.with_notes(|card| self.lookup(&card.name_en))
    }

    fn scan(&self, key: &str) -> Option<Arc<str>> {
        self.scans.fetch_add(1, Ordering::Relaxed);

        let tag = regex::escape(key);
        let pattern = match RegexBuilder::new(&format!("<{tag}>(.*?)</{tag}>"))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(key, error = %e, "could not build note pattern");
                return None;
            }
        };

        let body = pattern.captures(&self.corpus)?.get(1)?.as_str().trim();
        (!body.is_empty()).then(|| Arc::from(body))
    }
}

/// Normalize a card name into a note key.
pub fn note_key(name: &str) -> String {
    name.trim().to_lowercase()
}
