//! Languages the reader works in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reading language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English. Prompts and primary readings are written in English.
    En,
    /// Korean. Questions arrive and translated readings leave in Korean.
    Ko,
}

impl Language {
    /// Language the reading is generated in.
    pub const PRIMARY: Self = Self::En;
    /// Language the reading is translated into.
    pub const TRANSLATED: Self = Self::Ko;

    /// Parse a language code or name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Some(Self::En),
            "ko" | "kr" | "kor" | "korean" => Some(Self::Ko),
            _ => None,
        }
    }

    /// Two-letter code, also used as the key suffix in readings.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ko => "ko",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
