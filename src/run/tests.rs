#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

#[test]
fn test_format_amount_small() {
    assert_eq!(format_amount(dec!(5)), "$5.00");
    assert_eq!(format_amount(dec!(42.5)), "$42.50");
}

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-1234.56)), "-$1,234.56");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "$0.00");
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert!(parse_amount("abc").is_err());
    assert_eq!(parse_amount("19.99").unwrap(), dec!(19.99));
}

#[test]
fn test_parse_date_is_noon() {
    let dt = parse_date("2024-06-15").unwrap();
    assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-06-15 12:00");
    assert!(parse_date("15/06/2024").is_err());
}

#[test]
fn test_parse_due_date_is_end_of_day() {
    let dt = parse_due_date("2024-06-15").unwrap();
    assert_eq!(dt.format("%H:%M").to_string(), "23:59");
}

#[test]
fn test_parse_toggle() {
    assert!(parse_toggle("on").unwrap());
    assert!(parse_toggle("Yes").unwrap());
    assert!(!parse_toggle("off").unwrap());
    assert!(parse_toggle("maybe").is_err());
}

#[test]
fn test_flag_picks_value_after_name() {
    let args: Vec<String> = ["--category", "Food", "--date", "2024-06-01"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(flag(&args, "--category").as_deref(), Some("Food"));
    assert_eq!(flag(&args, "--date").as_deref(), Some("2024-06-01"));
    assert_eq!(flag(&args, "--goal"), None);
}

#[test]
fn test_match_id_prefix_and_ambiguity() {
    let a = Uuid::parse_str("aaaa1111-0000-0000-0000-000000000000").unwrap();
    let b = Uuid::parse_str("aaaa2222-0000-0000-0000-000000000000").unwrap();
    let items = vec![a, b];

    assert_eq!(*match_id(&items, |id| *id, "aaaa1111").unwrap(), a);
    // full id works too
    assert_eq!(
        *match_id(&items, |id| *id, &a.to_string()).unwrap(),
        a
    );
    assert!(match_id(&items, |id| *id, "aaaa").is_err());
    assert!(match_id(&items, |id| *id, "ffff").is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long description", 10), "a very lo…");
    assert_eq!(truncate("exact", 5), "exact");
}
