//! Common traits for provider adapters

use async_trait::async_trait;
use shelf_identifiers::Isbn;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{ProviderId, ProviderRecord};
use crate::http::HttpError;

/// Why a provider produced no record
///
/// Internal to adapters: [`BookSource::lookup`] absorbs every variant into
/// "no data".
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(HttpError),
    #[error("Unexpected status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rate limited")]
    RateLimit,
    #[error("Not found")]
    NotFound,
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// Metadata about a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    pub id: ProviderId,
    pub description: &'static str,
    pub base_url: &'static str,
    pub requires_api_key: bool,
}

/// One external metadata provider
///
/// Implementors supply [`fetch`](BookSource::fetch); callers use
/// [`lookup`](BookSource::lookup), which never fails.
#[async_trait]
pub trait BookSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Query the provider, reporting why nothing came back
    async fn fetch(&self, isbn: &Isbn) -> Result<ProviderRecord, SourceError>;

    /// Query the provider, returning `None` for any failure or empty record
    async fn lookup(&self, isbn: &Isbn) -> Option<ProviderRecord> {
        let provider = self.id();
        match self.fetch(isbn).await {
            Ok(record) => {
                let record = record.normalized();
                if record.is_empty() {
                    debug!(provider = %provider, isbn = %isbn, "Provider returned an empty record");
                    None
                } else {
                    debug!(
                        provider = %provider,
                        isbn = %isbn,
                        has_title = record.has_title(),
                        "Provider returned a record"
                    );
                    Some(record)
                }
            }
            Err(SourceError::NotFound) => {
                debug!(provider = %provider, isbn = %isbn, "Provider has no record");
                None
            }
            Err(e) => {
                warn!(provider = %provider, isbn = %isbn, error = %e, "Provider lookup failed");
                None
            }
        }
    }
}

/// Check the status and hand back the body of a provider response
pub(crate) fn expect_success(response: crate::http::HttpResponse) -> Result<String, SourceError> {
    match response.status {
        200..=299 => Ok(response.body),
        404 => Err(SourceError::NotFound),
        status => Err(SourceError::Status(status)),
    }
}
