//! Provider records and the canonical book record

use serde::{Deserialize, Serialize};
use shelf_identifiers::{Isbn, IsbnKind};

use super::provider::ProviderId;

/// Fields of a book record, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookField {
    Title,
    Author,
    Description,
    CoverUrl,
    Isbn13,
    Isbn10,
}

impl BookField {
    /// Get all fields
    pub fn all() -> &'static [BookField] {
        &[
            BookField::Title,
            BookField::Author,
            BookField::Description,
            BookField::CoverUrl,
            BookField::Isbn13,
            BookField::Isbn10,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Description => "description",
            BookField::CoverUrl => "cover_url",
            BookField::Isbn13 => "isbn13",
            BookField::Isbn10 => "isbn10",
        }
    }
}

/// Normalized output of one provider for one lookup
///
/// `None` means the provider did not supply the field. Blank strings never
/// survive [`ProviderRecord::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub title: Option<String>,
    /// Display string; multiple authors joined with ", "
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub isbn13: Option<Isbn>,
    pub isbn10: Option<Isbn>,
}

impl ProviderRecord {
    /// Trim text fields and drop the blank ones
    pub fn normalized(self) -> Self {
        Self {
            title: non_blank(self.title),
            author: non_blank(self.author),
            description: non_blank(self.description),
            cover_url: non_blank(self.cover_url),
            isbn13: self.isbn13,
            isbn10: self.isbn10,
        }
    }

    /// Route a provider-supplied identifier into the matching slot
    ///
    /// Invalid identifiers are dropped and an occupied slot is kept. Returns
    /// whether the identifier was stored.
    pub fn add_identifier(&mut self, raw: &str) -> bool {
        let Ok(isbn) = Isbn::parse(raw) else {
            return false;
        };
        let slot = match isbn.kind() {
            IsbnKind::Isbn13 => &mut self.isbn13,
            IsbnKind::Isbn10 => &mut self.isbn10,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(isbn);
        true
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_field(&self, field: BookField) -> bool {
        fn filled(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }
        match field {
            BookField::Title => filled(&self.title),
            BookField::Author => filled(&self.author),
            BookField::Description => filled(&self.description),
            BookField::CoverUrl => filled(&self.cover_url),
            BookField::Isbn13 => self.isbn13.is_some(),
            BookField::Isbn10 => self.isbn10.is_some(),
        }
    }

    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        !BookField::all().iter().any(|f| self.has_field(*f))
    }
}

/// Where a canonical field value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Won the merge for this field
    Provider(ProviderId),
    /// Computed by ISBN conversion from the other identifier; carries that
    /// identifier's provider, `None` when it was the lookup key
    Converted(Option<ProviderId>),
    /// The validated identifier that was looked up
    Query,
    /// Typed in by the user
    Manual,
}

impl FieldSource {
    /// Provenance for a value converted from a value with this provenance
    pub fn converted(self) -> FieldSource {
        match self {
            FieldSource::Provider(id) | FieldSource::Converted(Some(id)) => {
                FieldSource::Converted(Some(id))
            }
            _ => FieldSource::Converted(None),
        }
    }

    pub fn provider(self) -> Option<ProviderId> {
        match self {
            FieldSource::Provider(id) | FieldSource::Converted(Some(id)) => Some(id),
            _ => None,
        }
    }

    pub fn label(self) -> String {
        match self {
            FieldSource::Provider(id) => id.display_name().to_string(),
            FieldSource::Converted(Some(id)) => format!("converted from {}", id.display_name()),
            FieldSource::Converted(None) => "converted from lookup ISBN".to_string(),
            FieldSource::Query => "lookup ISBN".to_string(),
            FieldSource::Manual => "manual entry".to_string(),
        }
    }
}

/// A value tagged with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: FieldSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: FieldSource) -> Self {
        Self { value, source }
    }
}

/// The reconciled record handed to persistence and presentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalBookRecord {
    pub title: Option<Sourced<String>>,
    pub author: Option<Sourced<String>>,
    pub description: Option<Sourced<String>>,
    pub cover_url: Option<Sourced<String>>,
    pub isbn13: Option<Sourced<Isbn>>,
    pub isbn10: Option<Sourced<Isbn>>,
}

impl CanonicalBookRecord {
    /// Take every field of one provider record
    pub fn from_provider(provider: ProviderId, record: ProviderRecord) -> Self {
        let tag = |value| Sourced::new(value, FieldSource::Provider(provider));
        let record = record.normalized();
        Self {
            title: record.title.map(tag),
            author: record.author.map(tag),
            description: record.description.map(tag),
            cover_url: record.cover_url.map(tag),
            isbn13: record
                .isbn13
                .map(|isbn| Sourced::new(isbn, FieldSource::Provider(provider))),
            isbn10: record
                .isbn10
                .map(|isbn| Sourced::new(isbn, FieldSource::Provider(provider))),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().map(|s| s.value.as_str())
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_ref().map(|s| s.value.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|s| s.value.as_str())
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_ref().map(|s| s.value.as_str())
    }

    pub fn isbn13(&self) -> Option<&Isbn> {
        self.isbn13.as_ref().map(|s| &s.value)
    }

    pub fn isbn10(&self) -> Option<&Isbn> {
        self.isbn10.as_ref().map(|s| &s.value)
    }

    pub fn has_title(&self) -> bool {
        self.title().is_some_and(|t| !t.trim().is_empty())
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        BookField::all().iter().all(|f| self.source_of(*f).is_none())
    }

    /// Provenance of a field, `None` when the field is absent
    pub fn source_of(&self, field: BookField) -> Option<FieldSource> {
        match field {
            BookField::Title => self.title.as_ref().map(|s| s.source),
            BookField::Author => self.author.as_ref().map(|s| s.source),
            BookField::Description => self.description.as_ref().map(|s| s.source),
            BookField::CoverUrl => self.cover_url.as_ref().map(|s| s.source),
            BookField::Isbn13 => self.isbn13.as_ref().map(|s| s.source),
            BookField::Isbn10 => self.isbn10.as_ref().map(|s| s.source),
        }
    }

    /// Display value of a field
    pub fn display_value(&self, field: BookField) -> Option<&str> {
        match field {
            BookField::Title => self.title(),
            BookField::Author => self.author(),
            BookField::Description => self.description(),
            BookField::CoverUrl => self.cover_url(),
            BookField::Isbn13 => self.isbn13().map(Isbn::as_str),
            BookField::Isbn10 => self.isbn10().map(Isbn::as_str),
        }
    }

    /// Providers credited for at least one field, without duplicates
    pub fn providers(&self) -> Vec<ProviderId> {
        let mut providers = Vec::new();
        for field in BookField::all() {
            if let Some(id) = self.source_of(*field).and_then(FieldSource::provider) {
                if !providers.contains(&id) {
                    providers.push(id);
                }
            }
        }
        providers
    }

    /// Use the lookup key when no provider supplied either identifier
    pub fn fill_from_query(&mut self, isbn: &Isbn) {
        if self.isbn13.is_some() || self.isbn10.is_some() {
            return;
        }
        let sourced = Sourced::new(isbn.clone(), FieldSource::Query);
        match isbn.kind() {
            IsbnKind::Isbn13 => self.isbn13 = Some(sourced),
            IsbnKind::Isbn10 => self.isbn10 = Some(sourced),
        }
    }

    /// Derive whichever ISBN form is missing from the one present
    ///
    /// A 979 ISBN-13 leaves the ISBN-10 absent.
    pub fn fill_missing_isbns(&mut self) {
        if self.isbn10.is_none() {
            if let Some(isbn13) = &self.isbn13 {
                let derived = isbn13
                    .value
                    .to_isbn10()
                    .map(|isbn10| Sourced::new(isbn10, isbn13.source.converted()));
                self.isbn10 = derived;
            }
        }
        if self.isbn13.is_none() {
            if let Some(isbn10) = &self.isbn10 {
                let derived = Sourced::new(isbn10.value.to_isbn13(), isbn10.source.converted());
                self.isbn13 = Some(derived);
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_blank_fields() {
        let record = ProviderRecord {
            title: Some("  Dune ".to_string()),
            author: Some("   ".to_string()),
            description: Some(String::new()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.author, None);
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_add_identifier_routes_by_kind() {
        let mut record = ProviderRecord::default();
        assert!(record.add_identifier("978-0-306-40615-7"));
        assert!(record.add_identifier("0306406152"));
        assert!(!record.add_identifier("not an isbn"));
        assert!(!record.add_identifier("9780804429573")); // slot already taken

        assert_eq!(record.isbn13.unwrap().as_str(), "9780306406157");
        assert_eq!(record.isbn10.unwrap().as_str(), "0306406152");
    }

    #[test]
    fn test_is_empty() {
        assert!(ProviderRecord::default().is_empty());
        let record = ProviderRecord {
            cover_url: Some("https://example.com/c.jpg".to_string()),
            ..Default::default()
        };
        assert!(!record.is_empty());
        assert!(!record.has_title());

        assert!(CanonicalBookRecord::default().is_empty());
        let canonical = CanonicalBookRecord::from_provider(ProviderId::Isbndb, record);
        assert!(!canonical.is_empty());
        assert!(!canonical.has_title());
    }

    #[test]
    fn test_fill_missing_isbn10_from_provider_isbn13() {
        let mut record = CanonicalBookRecord {
            isbn13: Some(Sourced::new(
                Isbn::parse("9780306406157").unwrap(),
                FieldSource::Provider(ProviderId::OpenLibrary),
            )),
            ..Default::default()
        };
        record.fill_missing_isbns();

        assert_eq!(record.isbn10().unwrap().as_str(), "0306406152");
        assert_eq!(
            record.source_of(BookField::Isbn10),
            Some(FieldSource::Converted(Some(ProviderId::OpenLibrary)))
        );
    }

    #[test]
    fn test_fill_missing_leaves_979_without_isbn10() {
        let mut record = CanonicalBookRecord::default();
        record.fill_from_query(&Isbn::parse("9791034304103").unwrap());
        record.fill_missing_isbns();

        assert_eq!(record.source_of(BookField::Isbn13), Some(FieldSource::Query));
        assert!(record.isbn10.is_none());
    }

    #[test]
    fn test_fill_from_query_does_not_override_provider() {
        let mut record = CanonicalBookRecord::from_provider(
            ProviderId::Isbndb,
            ProviderRecord {
                isbn10: Isbn::parse("0306406152").ok(),
                ..Default::default()
            },
        );
        record.fill_from_query(&Isbn::parse("9780804429573").unwrap());
        record.fill_missing_isbns();

        assert_eq!(record.isbn13().unwrap().as_str(), "9780306406157");
        assert_eq!(record.providers(), vec![ProviderId::Isbndb]);
    }
}
