//! Core of the Lenormand reader.
//!
//! Loads the static card and spread tables, draws cards into a spread's
//! positions, and attaches reader notes looked up from a tag-delimited
//! text corpus.

pub mod card;
pub mod draw;
mod entries;
pub mod error;
pub mod notes;
pub mod spread;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use card::{Card, Deck};
pub use draw::{Draw, DrawnCard};
pub use error::{DeckError, DeckResult};
pub use notes::NoteRepository;
pub use spread::{Position, Spread, SpreadTable};
pub use store::Store;
