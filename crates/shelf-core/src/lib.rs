//! shelf-core: book metadata resolution for the shelf collection tracker
//!
//! This library provides:
//! - Normalized book records with per-field provenance
//! - An HTTP client abstraction shared by provider adapters
//! - Adapters for Google Books, Open Library and ISBNdb
//! - The resolution engine: validate, fan out, merge, derive missing ISBNs
//! - Configuration loading (TOML/JSON)
//!
//! Persistence and presentation are left to callers, which consume
//! [`CanonicalBookRecord`]s.

pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod resolution;
pub mod sources;

pub use config::{ConfigError, LookupConfig, ShelfConfig, SourcesConfig};
pub use domain::{
    BookField, CanonicalBookRecord, FieldSource, ManualEntry, ProviderId, ProviderRecord, Sourced,
};
pub use error::{Result, ShelfError};
pub use resolution::{LookupError, MergePolicy, Resolution, Resolver};
pub use sources::{BookSource, SourceError};

pub use shelf_identifiers::{InvalidReason, Isbn, IsbnError, IsbnKind};
