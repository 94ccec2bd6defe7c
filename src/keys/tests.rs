//! Tests for keys module

use super::*;
use crate::error::ErrorKind;
use test_case::test_case;

// ============================================================================
// Extraction Tests
// ============================================================================

#[test_case("stocks/LYFT/LYFT2025-11-17_15-26-55.csv", "LYFT", "2025-11-17_15-26-55" ; "canonical key")]
#[test_case("stocks/AAPL/AAPL20240102.csv", "AAPL", "20240102" ; "compact timestamp")]
#[test_case("stocks/MSFT/MSFT2024-01-02.tar.gz", "MSFT", "2024-01-02" ; "multiple extensions")]
#[test_case("stocks/NVDA/NVDA2024-01-02", "NVDA", "2024-01-02" ; "no extension")]
#[test_case("raw/daily/stocks/TSLA/TSLA2024.csv", "daily", "TSLA2024" ; "symbol is always the second segment")]
#[test_case("stocks/IBM", "IBM", "" ; "two segments")]
fn test_extract_symbol_timestamp(key: &str, symbol: &str, timestamp: &str) {
    let parts = extract_symbol_timestamp(key).unwrap();
    assert_eq!(parts.symbol, symbol);
    assert_eq!(parts.timestamp, timestamp);
}

#[test_case("LYFT2025-11-17.csv" ; "no separator")]
#[test_case("" ; "empty key")]
fn test_extract_rejects_single_segment(key: &str) {
    let err = extract_symbol_timestamp(key).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyFormat);
    assert!(err.to_string().contains(key));
}

#[test]
fn test_extract_removes_first_occurrence_only() {
    // Symbol recurs inside the timestamp: only the leading copy is dropped
    let parts = extract_symbol_timestamp("stocks/A/A2024-A.csv").unwrap();
    assert_eq!(parts.timestamp, "2024-A");
}

#[test]
fn test_extract_symbol_not_a_prefix() {
    // Symbol absent from the front: the first occurrence anywhere is removed
    let parts = extract_symbol_timestamp("stocks/GE/2024GE01.csv").unwrap();
    assert_eq!(parts.timestamp, "202401");

    // Symbol absent entirely: stem passes through unchanged
    let parts = extract_symbol_timestamp("stocks/GE/2024-01-02.csv").unwrap();
    assert_eq!(parts.timestamp, "2024-01-02");
}

#[test]
fn test_extract_empty_symbol_segment() {
    let parts = extract_symbol_timestamp("stocks//X2024.csv").unwrap();
    assert_eq!(parts.symbol, "");
    assert_eq!(parts.timestamp, "X2024");
}

// ============================================================================
// Composite Key Tests
// ============================================================================

#[test]
fn test_partition_key() {
    let parts = KeyParts::new("LYFT", "2025-11-17_15-26-55");
    assert_eq!(parts.partition_key(), "LYFT_2025-11-17_15-26-55");
}

#[test]
fn test_row_key() {
    assert_eq!(row_key("2025-11-17", 0), "2025-11-17_0");
    assert_eq!(row_key("2025-11-17", 12), "2025-11-17_12");
    assert_eq!(row_key("", 3), "_3");
}

#[test]
fn test_keys_are_stable_across_runs() {
    let key = "stocks/LYFT/LYFT2025-11-17_15-26-55.csv";
    let first = extract_symbol_timestamp(key).unwrap();
    let second = extract_symbol_timestamp(key).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.partition_key(), second.partition_key());
}
