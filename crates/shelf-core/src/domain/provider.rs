//! External metadata providers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External sources that can supply book metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Google Books volumes API
    GoogleBooks,
    /// Open Library edition records
    OpenLibrary,
    /// ISBNdb (API key required for useful results)
    Isbndb,
}

impl ProviderId {
    /// Get all providers in default priority order
    pub fn all() -> &'static [ProviderId] {
        &[
            ProviderId::GoogleBooks,
            ProviderId::OpenLibrary,
            ProviderId::Isbndb,
        ]
    }

    /// Identifier used in configuration files and logs
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::GoogleBooks => "google_books",
            ProviderId::OpenLibrary => "open_library",
            ProviderId::Isbndb => "isbndb",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderId::GoogleBooks => "Google Books",
            ProviderId::OpenLibrary => "Open Library",
            ProviderId::Isbndb => "ISBNdb",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ProviderId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| format!("Unknown provider: {}", s))
    }
}
