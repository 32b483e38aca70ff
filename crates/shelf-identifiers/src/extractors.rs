//! ISBN extraction from text

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validators::Isbn;

/// ISBN found in text with its byte position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIsbn {
    pub isbn: Isbn,
    pub start_index: usize,
    pub end_index: usize,
}

lazy_static! {
    // ISBN-10 and ISBN-13, optionally labelled and hyphen/space separated
    static ref ISBN_REGEX: Regex = Regex::new(
        r"(?i)(?:isbn(?:-1[03])?[:\s-]*)?(?P<isbn>(?:97[89][- ]?)?(?:\d[- ]?){9}[\dxX])"
    ).unwrap();
}

/// Extract checksum-valid ISBNs from text with positions
///
/// Candidates that fail validation are skipped. Results are in order of
/// appearance.
pub fn extract_isbn_matches(text: &str) -> Vec<ExtractedIsbn> {
    ISBN_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.name("isbn"))
        .filter_map(|m| {
            Isbn::parse(m.as_str()).ok().map(|isbn| ExtractedIsbn {
                isbn,
                start_index: m.start(),
                end_index: m.end(),
            })
        })
        .collect()
}

/// Extract distinct checksum-valid ISBNs from text
pub fn extract_isbns(text: &str) -> Vec<Isbn> {
    let mut found: Vec<Isbn> = Vec::new();
    for extracted in extract_isbn_matches(text) {
        if !found.contains(&extracted.isbn) {
            found.push(extracted.isbn);
        }
    }
    found
}
