//! Spread layouts and their positions.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entries::Entries;
use crate::error::{DeckError, DeckResult};

/// One labeled place in a spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Stable key for the slot (e.g. `past`).
    pub slot: String,
    /// English label.
    #[serde(default)]
    pub label_en: String,
    /// Korean label.
    #[serde(default)]
    pub label_ko: String,
    /// Grid row for tableau-style layouts.
    #[serde(default)]
    pub row: Option<u32>,
    /// Grid column for tableau-style layouts.
    #[serde(default)]
    pub column: Option<u32>,
}

impl Position {
    /// Create a position without grid coordinates.
    pub fn new(
        slot: impl Into<String>,
        label_en: impl Into<String>,
        label_ko: impl Into<String>,
    ) -> Self {
        Self {
            slot: slot.into(),
            label_en: label_en.into(),
            label_ko: label_ko.into(),
            row: None,
            column: None,
        }
    }

    /// The English label, or the slot key when no label is set.
    pub fn label(&self) -> &str {
        if self.label_en.trim().is_empty() {
            &self.slot
        } else {
            &self.label_en
        }
    }
}

/// A named layout: how many cards and what each position means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spread {
    /// Spread id, taken from its key in `spreads.json`.
    #[serde(skip_deserializing)]
    pub id: String,
    /// English display name.
    #[serde(default)]
    pub name_en: String,
    /// Korean display name.
    #[serde(default)]
    pub name_ko: String,
    /// Short English description.
    #[serde(default)]
    pub description_en: Option<String>,
    /// Number of cards drawn.
    pub card_count: usize,
    /// Positions in narrative order.
    pub positions: Vec<Position>,
}

impl Spread {
    /// Check the spread's internal invariants.
    pub fn validate(&self) -> DeckResult<()> {
        if self.card_count == 0 {
            return Err(DeckError::Configuration(format!(
                "spread \"{}\" draws no cards",
                self.id
            )));
        }
        if self.card_count != self.positions.len() {
            return Err(DeckError::Configuration(format!(
                "spread \"{}\" declares {} cards but defines {} positions",
                self.id,
                self.card_count,
                self.positions.len()
            )));
        }
        let mut seen = HashSet::new();
        for position in &self.positions {
            if !seen.insert(position.slot.as_str()) {
                return Err(DeckError::Configuration(format!(
                    "spread \"{}\" repeats slot \"{}\"",
                    self.id, position.slot
                )));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct SpreadFile {
    spreads: Entries<Spread>,
}

/// All known spreads, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SpreadTable {
    spreads: BTreeMap<String, Spread>,
}

impl SpreadTable {
    /// Build a table from validated spreads, rejecting repeated ids.
    pub fn from_spreads(spreads: impl IntoIterator<Item = Spread>) -> DeckResult<Self> {
        let mut map = BTreeMap::new();
        for spread in spreads {
            spread.validate()?;
            let id = spread.id.clone();
            if map.insert(id.clone(), spread).is_some() {
                return Err(DeckError::Configuration(format!("duplicate spread id \"{id}\"")));
            }
        }
        Ok(Self { spreads: map })
    }

    /// Parse the `spreads.json` format: `{"spreads": {<id>: {...}}}`.
    pub fn from_json(json: &str) -> DeckResult<Self> {
        let file: SpreadFile = serde_json::from_str(json).map_err(|source| DeckError::Json {
            table: "spreads",
            source,
        })?;

        Self::from_spreads(file.spreads.0.into_iter().map(|(id, mut spread)| {
            spread.id = id;
            spread
        }))
    }

    /// Look up a spread by id.
    pub fn get(&self, id: &str) -> Option<&Spread> {
        self.spreads.get(id)
    }

    /// Iterate over spreads in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Spread> {
        self.spreads.values()
    }

    /// Number of spreads.
    pub fn len(&self) -> usize {
        self.spreads.len()
    }

    /// Returns true if no spreads are defined.
    pub fn is_empty(&self) -> bool {
        self.spreads.is_empty()
    }
}
