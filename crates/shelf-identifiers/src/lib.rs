// Allow manual modulo checks since .is_multiple_of() is nightly-only
#![allow(clippy::manual_is_multiple_of)]

//! ISBN identifiers for the shelf book collection
//!
//! This crate provides pure, I/O-free tools for working with ISBNs:
//! - Normalization of user-entered identifiers (separators, check letter case)
//! - ISBN-10 and ISBN-13 checksum validation with typed failure reasons
//! - Lossless conversion between the two encodings
//! - ISBN extraction from free text

pub mod extractors;
pub mod validators;

pub use extractors::*;
pub use validators::*;
