//! Manual entry for books without a usable ISBN

use serde::{Deserialize, Serialize};

use super::record::{CanonicalBookRecord, FieldSource, Sourced};

const UNTITLED: &str = "Untitled";
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Free-text title/author typed by the user
///
/// No checksum applies and no provider is consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub title: String,
    pub author: String,
}

impl ManualEntry {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    pub fn into_record(self) -> CanonicalBookRecord {
        let or_default = |value: String, default: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        };

        CanonicalBookRecord {
            title: Some(Sourced::new(
                or_default(self.title, UNTITLED),
                FieldSource::Manual,
            )),
            author: Some(Sourced::new(
                or_default(self.author, UNKNOWN_AUTHOR),
                FieldSource::Manual,
            )),
            ..Default::default()
        }
    }
}
