//! Google Books source for ISBN metadata
//!
//! API docs: https://developers.google.com/books/docs/v1/using
//! Works without a key at low volume; a key raises the quota.

use super::traits::{expect_success, BookSource, SourceError, SourceMetadata};
use super::{join_authors, secure_image_url};
use crate::config::GoogleBooksConfig;
use crate::domain::{ProviderId, ProviderRecord};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;
use shelf_identifiers::Isbn;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default, deserialize_with = "super::null_as_empty")]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    authors: Vec<String>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

pub struct GoogleBooksSource {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksSource {
    pub fn new(client: HttpClient, config: &GoogleBooksConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: ProviderId::GoogleBooks,
            description: "Google Books volumes search by ISBN",
            base_url: "https://www.googleapis.com/books/v1",
            requires_api_key: false,
        }
    }

    /// Parse a volumes search response, using the first matching volume
    pub fn parse_volumes_response(json: &str) -> Result<ProviderRecord, SourceError> {
        let response: VolumesResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Google Books JSON: {}", e)))?;

        let info = response
            .items
            .into_iter()
            .find_map(|item| item.volume_info)
            .ok_or(SourceError::NotFound)?;

        let cover_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .and_then(|url| secure_image_url(&url));

        let mut record = ProviderRecord {
            title: info.title,
            author: join_authors(&info.authors),
            description: info.description,
            cover_url,
            ..Default::default()
        };

        for id in info
            .industry_identifiers
            .iter()
            .filter(|id| id.kind == "ISBN_13" || id.kind == "ISBN_10")
        {
            record.add_identifier(&id.identifier);
        }

        Ok(record)
    }
}

#[async_trait]
impl BookSource for GoogleBooksSource {
    fn id(&self) -> ProviderId {
        ProviderId::GoogleBooks
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<ProviderRecord, SourceError> {
        let url = format!("{}/volumes", self.base_url);
        let query = format!("isbn:{}", isbn);

        let mut params = vec![("q", query.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }

        let response = self.client.get_with_params(&url, &params).await?;
        let body = expect_success(response)?;
        Self::parse_volumes_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 1,
        "items": [{
            "volumeInfo": {
                "title": "The Left Hand of Darkness",
                "authors": ["Ursula K. Le Guin", "Charlie Jane Anders"],
                "description": "A lone human ambassador is sent to Winter.",
                "imageLinks": {
                    "smallThumbnail": "http://books.google.com/books/content?id=x&zoom=5",
                    "thumbnail": "http://books.google.com/books/content?id=x&zoom=1"
                },
                "industryIdentifiers": [
                    {"type": "ISBN_10", "identifier": "0441478123"},
                    {"type": "ISBN_13", "identifier": "9780441478125"},
                    {"type": "OTHER", "identifier": "UOM:39015"}
                ]
            }
        }]
    }"#;

    #[test]
    fn test_parse_volumes_response() {
        let record = GoogleBooksSource::parse_volumes_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(record.title.as_deref(), Some("The Left Hand of Darkness"));
        assert_eq!(
            record.author.as_deref(),
            Some("Ursula K. Le Guin, Charlie Jane Anders")
        );
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://books.google.com/books/content?id=x&zoom=1")
        );
        assert_eq!(record.isbn13.unwrap().as_str(), "9780441478125");
        assert_eq!(record.isbn10.unwrap().as_str(), "0441478123");
    }

    #[test]
    fn test_parse_no_items() {
        let result = GoogleBooksSource::parse_volumes_response(
            r#"{"kind": "books#volumes", "totalItems": 0}"#,
        );
        assert!(matches!(result, Err(SourceError::NotFound)));
    }

    #[test]
    fn test_parse_null_lists() {
        let json = r#"{"items": [{"volumeInfo": {
            "title": "The Left Hand of Darkness",
            "authors": null,
            "industryIdentifiers": null
        }}]}"#;
        let record = GoogleBooksSource::parse_volumes_response(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("The Left Hand of Darkness"));
        assert_eq!(record.author, None);
        assert_eq!(record.isbn13, None);

        let result = GoogleBooksSource::parse_volumes_response(r#"{"items": null}"#);
        assert!(matches!(result, Err(SourceError::NotFound)));
    }

    #[test]
    fn test_parse_malformed() {
        let result = GoogleBooksSource::parse_volumes_response("<html>oops</html>");
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_small_thumbnail_fallback_and_bad_identifier() {
        let json = r#"{"items": [{"volumeInfo": {
            "title": "T",
            "imageLinks": {"smallThumbnail": "http://example.com/s.jpg"},
            "industryIdentifiers": [{"type": "ISBN_13", "identifier": "9780441478126"}]
        }}]}"#;
        let record = GoogleBooksSource::parse_volumes_response(json).unwrap();
        assert_eq!(record.cover_url.as_deref(), Some("https://example.com/s.jpg"));
        assert_eq!(record.author, None);
        assert_eq!(record.isbn13, None);
    }
}
