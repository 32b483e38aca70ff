//! Resolution engine: one ISBN in, one canonical record out
//!
//! A lookup runs validate, dispatch, merge, derive:
//! - the raw identifier is validated before any provider is called
//! - every provider is queried concurrently, each bounded by the timeout
//! - results are merged in priority order under the configured policy
//! - the missing ISBN form is derived by conversion
//!
//! A record without a title is still returned when some provider supplied
//! other fields; only a lookup where nothing came back is a no-match.
//!
//! Provider calls are plain futures joined in place, so dropping the
//! `resolve` future cancels whatever is still in flight.

pub mod merge;

pub use merge::*;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use shelf_identifiers::{Isbn, IsbnError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ShelfConfig;
use crate::domain::{CanonicalBookRecord, ProviderId};
use crate::error::ShelfError;
use crate::http::HttpClient;
use crate::sources::{BookSource, GoogleBooksSource, IsbndbSource, OpenLibrarySource};

/// Terminal failure of a lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Input was malformed; nothing was queried
    #[error(transparent)]
    InvalidIdentifier(#[from] IsbnError),

    /// Input was valid but no provider returned any data for it
    #[error("No source had data for ISBN {isbn}")]
    NoMatchFound { isbn: Isbn },
}

impl LookupError {
    /// True when the user should correct the identifier rather than enter the book manually
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LookupError::InvalidIdentifier(_))
    }
}

/// Successful lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The validated identifier that was looked up
    pub isbn: Isbn,
    pub policy: MergePolicy,
    pub record: CanonicalBookRecord,
    /// Providers credited with at least one field, in priority order
    pub contributors: Vec<ProviderId>,
    /// Providers that returned any data, in priority order
    pub responders: Vec<ProviderId>,
}

/// Resolution engine over a ranked set of providers
pub struct Resolver {
    sources: Vec<Arc<dyn BookSource>>,
    policy: MergePolicy,
    timeout: Duration,
}

impl Resolver {
    /// Sources are ranked in the order given
    pub fn new(sources: Vec<Arc<dyn BookSource>>, policy: MergePolicy, timeout: Duration) -> Self {
        Self {
            sources,
            policy,
            timeout,
        }
    }

    /// Build the HTTP adapters enabled in `config`, in its priority order
    pub fn from_config(config: &ShelfConfig) -> Result<Self, ShelfError> {
        config.validate()?;

        let client = HttpClient::new(&config.lookup.user_agent, config.lookup.timeout())?;
        let sources = config
            .enabled_providers()
            .into_iter()
            .map(|id| -> Arc<dyn BookSource> {
                match id {
                    ProviderId::GoogleBooks => Arc::new(GoogleBooksSource::new(
                        client.clone(),
                        &config.sources.google_books,
                    )),
                    ProviderId::OpenLibrary => Arc::new(OpenLibrarySource::new(
                        client.clone(),
                        &config.sources.open_library,
                    )),
                    ProviderId::Isbndb => {
                        Arc::new(IsbndbSource::new(client.clone(), &config.sources.isbndb))
                    }
                }
            })
            .collect();

        Ok(Self::new(
            sources,
            config.lookup.policy,
            config.lookup.timeout(),
        ))
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Providers in priority order
    pub fn providers(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Validate a raw identifier and resolve it
    pub async fn resolve(&self, raw: &str) -> Result<Resolution, LookupError> {
        let isbn = Isbn::parse(raw).inspect_err(|e| {
            info!(input = %raw, reason = %e.reason(), "Rejected identifier before lookup");
        })?;
        self.resolve_isbn(&isbn).await
    }

    /// Resolve an already validated identifier
    pub async fn resolve_isbn(&self, isbn: &Isbn) -> Result<Resolution, LookupError> {
        let outcomes = self.dispatch(isbn).await;

        let responders: Vec<ProviderId> = outcomes
            .iter()
            .filter(|o| o.record.is_some())
            .map(|o| o.provider)
            .collect();

        let mut record = merge(self.policy, &outcomes);
        if responders.is_empty() || record.is_empty() {
            info!(isbn = %isbn, responders = responders.len(), "No match found");
            return Err(LookupError::NoMatchFound { isbn: isbn.clone() });
        }
        if !record.has_title() {
            info!(isbn = %isbn, "Resolved a partial record without a title");
        }

        record.fill_from_query(isbn);
        record.fill_missing_isbns();

        let credited = record.providers();
        let contributors: Vec<ProviderId> = self
            .providers()
            .into_iter()
            .filter(|id| credited.contains(id))
            .collect();

        info!(
            isbn = %isbn,
            policy = %self.policy,
            contributors = ?contributors,
            "Resolved book metadata"
        );

        Ok(Resolution {
            isbn: isbn.clone(),
            policy: self.policy,
            record,
            contributors,
            responders,
        })
    }

    /// Query every provider concurrently; outcomes come back in rank order
    async fn dispatch(&self, isbn: &Isbn) -> Vec<ProviderOutcome> {
        debug!(isbn = %isbn, providers = self.sources.len(), "Dispatching lookups");

        let calls = self.sources.iter().map(|source| async move {
            let provider = source.id();
            let record = match tokio::time::timeout(self.timeout, source.lookup(isbn)).await {
                Ok(record) => record,
                Err(_) => {
                    warn!(
                        provider = %provider,
                        isbn = %isbn,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Provider timed out"
                    );
                    None
                }
            };
            ProviderOutcome::new(provider, record)
        });

        join_all(calls).await
    }
}
