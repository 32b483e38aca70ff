//! ISBN validation and conversion integration tests

use proptest::prelude::*;
use rstest::rstest;
use shelf_identifiers::{
    extract_isbns, is_valid_isbn, normalize_isbn, validate_isbn, InvalidReason, Isbn, IsbnKind,
};

/// Independent ISBN-10 check character computation for building fixtures
fn isbn10_check(body: &str) -> char {
    let sum: u32 = body
        .chars()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap() * (10 - i as u32))
        .sum();
    match (11 - sum % 11) % 11 {
        10 => 'X',
        d => std::char::from_digit(d, 10).unwrap(),
    }
}

// === Validation ===

#[rstest]
#[case("9780306406157", IsbnKind::Isbn13)]
#[case("978-0-306-40615-7", IsbnKind::Isbn13)]
#[case("0306406152", IsbnKind::Isbn10)]
#[case("0-306-40615-2", IsbnKind::Isbn10)]
#[case("0 8044 2957 x", IsbnKind::Isbn10)]
#[case("979-10-343-0410-3", IsbnKind::Isbn13)]
fn test_valid_isbns(#[case] raw: &str, #[case] kind: IsbnKind) {
    let isbn = validate_isbn(&normalize_isbn(raw)).unwrap();
    assert_eq!(isbn.kind(), kind);
    assert!(is_valid_isbn(raw));
}

#[rstest]
#[case("", InvalidReason::Length)]
#[case("12345", InvalidReason::Length)]
#[case("97803064061570", InvalidReason::Length)]
#[case("03064O6152", InvalidReason::Charset)]
#[case("978030640615X", InvalidReason::TrailingX)]
#[case("9680306406157", InvalidReason::BadPrefix)]
#[case("9780306406158", InvalidReason::Checksum)]
#[case("0306406153", InvalidReason::Checksum)]
fn test_invalid_isbns(#[case] normalized: &str, #[case] reason: InvalidReason) {
    let err = validate_isbn(normalized).unwrap_err();
    assert_eq!(err.reason(), reason);
}

#[test]
fn test_reason_names_are_stable() {
    assert_eq!(InvalidReason::TrailingX.as_str(), "trailing_x");
    assert_eq!(InvalidReason::BadPrefix.as_str(), "bad_prefix");
    assert_eq!(
        serde_json::to_string(&InvalidReason::Checksum).unwrap(),
        "\"checksum\""
    );
}

// === Conversion ===

#[test]
fn test_979_conversion_is_absent_not_error() {
    let isbn = Isbn::parse("979-10-343-0410-3").unwrap();
    assert_eq!(isbn.prefix(), Some("979"));
    assert!(isbn.to_isbn10().is_none());
}

#[test]
fn test_serde_uses_bare_string() {
    let isbn = Isbn::parse("0-306-40615-2").unwrap();
    assert_eq!(serde_json::to_string(&isbn).unwrap(), "\"0306406152\"");

    let parsed: Isbn = serde_json::from_str("\"978-0-306-40615-7\"").unwrap();
    assert_eq!(parsed.as_str(), "9780306406157");

    assert!(serde_json::from_str::<Isbn>("\"9780306406158\"").is_err());
}

#[test]
fn test_from_str() {
    let isbn: Isbn = "080442957X".parse().unwrap();
    assert_eq!(isbn.to_isbn13().as_str(), "9780804429573");
}

#[test]
fn test_extract_from_citation() {
    let text = "Gamma et al., Design Patterns (ISBN 0-201-63361-2).";
    let isbns = extract_isbns(text);
    assert_eq!(isbns.len(), 1);
    assert_eq!(isbns[0].to_isbn13().as_str(), "9780201633610");
}

// === Properties ===

proptest! {
    #[test]
    fn prop_isbn10_round_trips_through_isbn13(body in "[0-9]{9}") {
        let raw = format!("{}{}", body, isbn10_check(&body));
        let isbn10 = validate_isbn(&normalize_isbn(&raw)).unwrap();

        let isbn13 = isbn10.to_isbn13();
        prop_assert_eq!(isbn13.kind(), IsbnKind::Isbn13);
        prop_assert_eq!(isbn13.prefix(), Some("978"));
        prop_assert!(validate_isbn(isbn13.as_str()).is_ok());

        let back = isbn13.to_isbn10().unwrap();
        prop_assert_eq!(back.as_str(), raw.as_str());
    }

    #[test]
    fn prop_wrong_length_always_fails_on_length(digits in "[0-9]{0,20}") {
        prop_assume!(digits.len() != 10 && digits.len() != 13);
        let err = validate_isbn(&digits).unwrap_err();
        prop_assert_eq!(err.reason(), InvalidReason::Length);
    }

    #[test]
    fn prop_separators_do_not_change_result(body in "[0-9]{9}") {
        let raw = format!("{}{}", body, isbn10_check(&body));
        let hyphenated = format!("{}-{}-{}", &raw[..1], &raw[1..5], &raw[5..]);
        prop_assert_eq!(Isbn::parse(&hyphenated).unwrap(), Isbn::parse(&raw).unwrap());
    }
}
