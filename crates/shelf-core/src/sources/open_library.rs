//! Open Library source for edition metadata
//!
//! API docs: https://openlibrary.org/dev/docs/api/books
//! Editions often reference authors by key only, which takes a second request
//! per author to turn into a name.

use super::traits::{expect_success, BookSource, SourceError, SourceMetadata};
use super::{join_authors, secure_image_url};
use crate::config::OpenLibraryConfig;
use crate::domain::{ProviderId, ProviderRecord};
use crate::http::HttpClient;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use shelf_identifiers::Isbn;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Edition {
    title: Option<String>,
    by_statement: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    authors: Vec<AuthorEntry>,
    description: Option<TextValue>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    covers: Vec<i64>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    isbn_13: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    isbn_10: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorEntry {
    name: Option<String>,
    key: Option<String>,
}

/// Open Library text fields are either plain strings or typed values
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    fn into_string(self) -> String {
        match self {
            TextValue::Plain(s) => s,
            TextValue::Typed { value } => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthorRecord {
    name: Option<String>,
    personal_name: Option<String>,
}

/// A parsed edition plus author keys still needing a lookup
#[derive(Debug, Clone, PartialEq)]
pub struct OpenLibraryEdition {
    pub record: ProviderRecord,
    /// Author references such as `/authors/OL23919A`; empty when the author
    /// name is already known
    pub author_keys: Vec<String>,
}

pub struct OpenLibrarySource {
    client: HttpClient,
    base_url: String,
    covers_url: String,
    resolve_authors: bool,
}

impl OpenLibrarySource {
    pub fn new(client: HttpClient, config: &OpenLibraryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.trim_end_matches('/').to_string(),
            resolve_authors: config.resolve_authors,
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: ProviderId::OpenLibrary,
            description: "Open Library edition records by ISBN",
            base_url: "https://openlibrary.org",
            requires_api_key: false,
        }
    }

    /// Parse an `/isbn/{isbn}.json` edition response
    ///
    /// Author precedence: `by_statement`, then inline names, then keys left
    /// for the caller to resolve.
    pub fn parse_edition_response(
        json: &str,
        covers_url: &str,
    ) -> Result<OpenLibraryEdition, SourceError> {
        let edition: Edition = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Open Library JSON: {}", e)))?;

        let inline_names = join_authors(edition.authors.iter().filter_map(|a| a.name.as_deref()));
        let author = edition
            .by_statement
            .filter(|s| !s.trim().is_empty())
            .or(inline_names);

        let author_keys = if author.is_some() {
            Vec::new()
        } else {
            edition.authors.into_iter().filter_map(|a| a.key).collect()
        };

        // Open Library uses -1 for "no cover"
        let cover_url = edition
            .covers
            .iter()
            .find(|id| **id > 0)
            .and_then(|id| secure_image_url(&format!("{}/b/id/{}-L.jpg", covers_url, id)));

        let mut record = ProviderRecord {
            title: edition.title,
            author,
            description: edition.description.map(TextValue::into_string),
            cover_url,
            ..Default::default()
        };
        for raw in edition.isbn_13.iter().chain(edition.isbn_10.iter()) {
            record.add_identifier(raw);
        }

        Ok(OpenLibraryEdition {
            record,
            author_keys,
        })
    }

    /// Parse an `/authors/{id}.json` response into a display name
    pub fn parse_author_response(json: &str) -> Option<String> {
        let author: AuthorRecord = serde_json::from_str(json).ok()?;
        author
            .name
            .or(author.personal_name)
            .filter(|n| !n.trim().is_empty())
    }

    /// Best effort: failed author lookups are skipped
    async fn resolve_author_names(&self, keys: &[String]) -> Option<String> {
        let lookups = keys.iter().map(|key| async move {
            let url = format!("{}{}.json", self.base_url, key);
            match self.client.get(&url).await {
                Ok(response) if response.is_success() => {
                    Self::parse_author_response(&response.body)
                }
                Ok(response) => {
                    debug!(key = %key, status = response.status, "Author lookup returned no data");
                    None
                }
                Err(e) => {
                    debug!(key = %key, error = %e, "Author lookup failed");
                    None
                }
            }
        });

        let names: Vec<String> = join_all(lookups).await.into_iter().flatten().collect();
        join_authors(names)
    }
}

#[async_trait]
impl BookSource for OpenLibrarySource {
    fn id(&self) -> ProviderId {
        ProviderId::OpenLibrary
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<ProviderRecord, SourceError> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);
        let response = self.client.get(&url).await?;
        let body = expect_success(response)?;

        let OpenLibraryEdition {
            mut record,
            author_keys,
        } = Self::parse_edition_response(&body, &self.covers_url)?;

        if self.resolve_authors && !author_keys.is_empty() {
            record.author = self.resolve_author_names(&author_keys).await;
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVERS: &str = "https://covers.openlibrary.org";

    const SAMPLE_EDITION: &str = r#"{
        "title": "Fantastic Mr. Fox",
        "authors": [{"key": "/authors/OL34184A"}],
        "covers": [-1, 6498519],
        "isbn_13": ["9780140328721"],
        "isbn_10": ["0140328726"],
        "description": {"type": "/type/text", "value": "Three farmers versus one fox."}
    }"#;

    #[test]
    fn test_parse_edition_with_author_reference() {
        let edition = OpenLibrarySource::parse_edition_response(SAMPLE_EDITION, COVERS).unwrap();
        assert_eq!(edition.record.title.as_deref(), Some("Fantastic Mr. Fox"));
        assert_eq!(edition.record.author, None);
        assert_eq!(edition.author_keys, vec!["/authors/OL34184A".to_string()]);
        assert_eq!(
            edition.record.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/6498519-L.jpg")
        );
        assert_eq!(
            edition.record.description.as_deref(),
            Some("Three farmers versus one fox.")
        );
        assert_eq!(edition.record.isbn13.unwrap().as_str(), "9780140328721");
        assert_eq!(edition.record.isbn10.unwrap().as_str(), "0140328726");
    }

    #[test]
    fn test_by_statement_wins() {
        let json = r#"{
            "title": "Dune",
            "by_statement": "Frank Herbert",
            "authors": [{"key": "/authors/OL79034A"}],
            "description": "Desert planet."
        }"#;
        let edition = OpenLibrarySource::parse_edition_response(json, COVERS).unwrap();
        assert_eq!(edition.record.author.as_deref(), Some("Frank Herbert"));
        assert!(edition.author_keys.is_empty());
        assert_eq!(edition.record.description.as_deref(), Some("Desert planet."));
        assert_eq!(edition.record.cover_url, None);
    }

    #[test]
    fn test_inline_author_names() {
        let json = r#"{"title": "T", "authors": [{"name": "A. Author"}, {"name": "B. Author"}]}"#;
        let edition = OpenLibrarySource::parse_edition_response(json, COVERS).unwrap();
        assert_eq!(edition.record.author.as_deref(), Some("A. Author, B. Author"));
    }

    #[test]
    fn test_parse_author_response() {
        assert_eq!(
            OpenLibrarySource::parse_author_response(r#"{"name": "Roald Dahl"}"#).as_deref(),
            Some("Roald Dahl")
        );
        assert_eq!(
            OpenLibrarySource::parse_author_response(r#"{"personal_name": "R. Dahl"}"#)
                .as_deref(),
            Some("R. Dahl")
        );
        assert_eq!(OpenLibrarySource::parse_author_response("{}"), None);
    }

    #[test]
    fn test_parse_null_lists() {
        let json = r#"{
            "title": "Fantastic Mr. Fox",
            "by_statement": "Roald Dahl",
            "authors": null,
            "covers": null,
            "isbn_13": null,
            "isbn_10": ["0140328726"]
        }"#;
        let edition = OpenLibrarySource::parse_edition_response(json, COVERS).unwrap();
        assert_eq!(edition.record.title.as_deref(), Some("Fantastic Mr. Fox"));
        assert_eq!(edition.record.author.as_deref(), Some("Roald Dahl"));
        assert_eq!(edition.record.cover_url, None);
        assert_eq!(edition.record.isbn13, None);
        assert_eq!(edition.record.isbn10.unwrap().as_str(), "0140328726");
    }

    #[test]
    fn test_parse_malformed() {
        let result = OpenLibrarySource::parse_edition_response("[1, 2]", COVERS);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }
}
