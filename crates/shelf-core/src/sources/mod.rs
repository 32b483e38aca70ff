//! Provider adapters for fetching book metadata from online databases

pub mod google_books;
pub mod isbndb;
pub mod open_library;
pub mod traits;

pub use google_books::*;
pub use isbndb::*;
pub use open_library::*;
pub use traits::*;

use crate::domain::ProviderId;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Static description of a provider
pub fn source_metadata(id: ProviderId) -> SourceMetadata {
    match id {
        ProviderId::GoogleBooks => GoogleBooksSource::metadata(),
        ProviderId::OpenLibrary => OpenLibrarySource::metadata(),
        ProviderId::Isbndb => IsbndbSource::metadata(),
    }
}

/// Join author names into one display string
///
/// Blank names are skipped; `None` when nothing is left.
pub fn join_authors<I, S>(names: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// Deserialize a JSON list, treating `null` like a missing key
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rewrite an image URL to https
///
/// Unparseable URLs are dropped.
pub fn secure_image_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if url.scheme() == "http" {
        url.set_scheme("https").ok()?;
    }
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_authors() {
        assert_eq!(
            join_authors(["Ursula K. Le Guin", " ", "Someone Else "]),
            Some("Ursula K. Le Guin, Someone Else".to_string())
        );
        assert_eq!(join_authors(Vec::<String>::new()), None);
    }

    #[test]
    fn test_secure_image_url() {
        assert_eq!(
            secure_image_url("http://books.google.com/books/content?id=abc&zoom=1").as_deref(),
            Some("https://books.google.com/books/content?id=abc&zoom=1")
        );
        assert_eq!(
            secure_image_url("https://covers.openlibrary.org/b/id/1-L.jpg").as_deref(),
            Some("https://covers.openlibrary.org/b/id/1-L.jpg")
        );
        assert_eq!(secure_image_url("not a url"), None);
    }

    #[test]
    fn test_source_metadata_matches_id() {
        for id in ProviderId::all() {
            assert_eq!(source_metadata(*id).id, *id);
        }
        assert!(source_metadata(ProviderId::Isbndb).requires_api_key);
    }
}
