//! ISBNdb source for book metadata
//!
//! API docs: https://isbndb.com/isbndb-api-documentation-v2
//! Requests without an API key are rejected, which surfaces as "no data".

use super::traits::{expect_success, BookSource, SourceError, SourceMetadata};
use super::{join_authors, secure_image_url};
use crate::config::IsbndbConfig;
use crate::domain::{ProviderId, ProviderRecord};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use shelf_identifiers::Isbn;

#[derive(Debug, Deserialize)]
struct BookResponse {
    book: Option<IsbndbBook>,
}

#[derive(Debug, Deserialize)]
struct IsbndbBook {
    title: Option<String>,
    title_long: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    authors: Vec<String>,
    synopsis: Option<String>,
    overview: Option<String>,
    image: Option<String>,
    isbn13: Option<String>,
    isbn10: Option<String>,
    isbn: Option<String>,
}

pub struct IsbndbSource {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl IsbndbSource {
    pub fn new(client: HttpClient, config: &IsbndbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: ProviderId::Isbndb,
            description: "ISBNdb commercial book database",
            base_url: "https://api2.isbndb.com",
            requires_api_key: true,
        }
    }

    /// Parse a `/book/{isbn}` response
    pub fn parse_book_response(json: &str) -> Result<ProviderRecord, SourceError> {
        let response: BookResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid ISBNdb JSON: {}", e)))?;
        let book = response.book.ok_or(SourceError::NotFound)?;

        let mut record = ProviderRecord {
            title: present(book.title).or(present(book.title_long)),
            author: join_authors(&book.authors),
            description: present(book.synopsis).or(present(book.overview)),
            cover_url: book.image.as_deref().and_then(secure_image_url),
            ..Default::default()
        };
        for raw in [&book.isbn13, &book.isbn10, &book.isbn].into_iter().flatten() {
            record.add_identifier(raw);
        }

        Ok(record)
    }
}

/// ISBNdb sends `""` for fields it has no value for
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl BookSource for IsbndbSource {
    fn id(&self) -> ProviderId {
        ProviderId::Isbndb
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<ProviderRecord, SourceError> {
        let url = format!("{}/book/{}", self.base_url, isbn);
        let response = match &self.api_key {
            Some(key) => {
                self.client
                    .get_with_headers(&url, &[("Authorization", key.as_str())])
                    .await?
            }
            None => self.client.get(&url).await?,
        };
        let body = expect_success(response)?;
        Self::parse_book_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "book": {
            "title": "Dune",
            "title_long": "Dune: Deluxe Edition",
            "authors": ["Herbert, Frank"],
            "synopsis": "Set on the desert planet Arrakis.",
            "image": "http://images.isbndb.com/covers/30/23/9780441013593.jpg",
            "isbn13": "9780441013593",
            "isbn": "0441013597"
        }
    }"#;

    #[test]
    fn test_parse_book_response() {
        let record = IsbndbSource::parse_book_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.author.as_deref(), Some("Herbert, Frank"));
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://images.isbndb.com/covers/30/23/9780441013593.jpg")
        );
        assert_eq!(record.isbn13.unwrap().as_str(), "9780441013593");
        assert_eq!(record.isbn10.unwrap().as_str(), "0441013597");
    }

    #[test]
    fn test_parse_fallback_fields() {
        let json = r#"{"book": {"title_long": "Long Title", "overview": "Overview text"}}"#;
        let record = IsbndbSource::parse_book_response(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("Long Title"));
        assert_eq!(record.description.as_deref(), Some("Overview text"));
    }

    #[test]
    fn test_parse_blank_fields_fall_back() {
        let json = r#"{"book": {
            "title": "",
            "title_long": "Dune: Deluxe Edition",
            "synopsis": "  ",
            "overview": "Arrakis."
        }}"#;
        let record = IsbndbSource::parse_book_response(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("Dune: Deluxe Edition"));
        assert_eq!(record.description.as_deref(), Some("Arrakis."));
    }

    #[test]
    fn test_parse_null_authors() {
        let json = r#"{"book": {"title": "Dune", "authors": null, "isbn13": "9780441013593"}}"#;
        let record = IsbndbSource::parse_book_response(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.author, None);
        assert_eq!(record.isbn13.unwrap().as_str(), "9780441013593");
    }

    #[test]
    fn test_parse_error_payload() {
        let result = IsbndbSource::parse_book_response(r#"{"errorMessage": "Not Found"}"#);
        assert!(matches!(result, Err(SourceError::NotFound)));
    }
}
