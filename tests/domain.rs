use assert_matches::assert_matches;

use covid_compare::domain::{CountryCode, parse_date};
use covid_compare::error::CompareError;

#[test]
fn parse_country_code_valid() {
    let code: CountryCode = "usa".parse().unwrap();
    assert_eq!(code.as_str(), "USA");
}

#[test]
fn parse_country_code_invalid() {
    let err = "".parse::<CountryCode>().unwrap_err();
    assert_matches!(err, CompareError::InvalidCountryCode(_));
}

#[test]
fn country_code_serde_round_trip() {
    let code: CountryCode = serde_json::from_str("\"deu\"").unwrap();
    assert_eq!(code.as_str(), "DEU");
    assert_eq!(serde_json::to_string(&code).unwrap(), "\"DEU\"");
    assert!(serde_json::from_str::<CountryCode>("\"D3U\"").is_err());
}

#[test]
fn parse_date_rejects_garbage() {
    assert_matches!(parse_date("2020-02-30"), Err(CompareError::InvalidDate(_)));
}
