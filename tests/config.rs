use chrono::NaiveDate;

use covid_compare::config::{ConfigLoader, ConfigOverrides, default_comparison_countries};
use covid_compare::error::CompareError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 4, 1).unwrap()
}

#[test]
fn resolve_from_file_with_overrides() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("covid-compare.json");
    std::fs::write(
        &path,
        r#"{
            "reference_country": "kor",
            "as_of_date": "2020-03-31",
            "comparison_countries": ["USA", "SWE", "NOR"],
            "cache_dir": "cache"
        }"#,
    )
    .unwrap();

    let overrides = ConfigOverrides {
        comparison_countries: Some(vec!["usa".to_string(), "kor".to_string()]),
        ..ConfigOverrides::default()
    };
    let resolved =
        ConfigLoader::resolve(Some(path.to_str().unwrap()), overrides, today()).unwrap();

    assert_eq!(resolved.reference_country.as_str(), "KOR");
    assert_eq!(resolved.as_of_date, NaiveDate::from_ymd_opt(2020, 3, 31).unwrap());
    assert_eq!(resolved.report_date, resolved.as_of_date);
    let codes: Vec<&str> = resolved
        .comparison_countries
        .iter()
        .map(|code| code.as_str())
        .collect();
    assert_eq!(codes, vec!["USA", "KOR"]);
    assert_eq!(resolved.cache_dir.as_str(), "cache");
}

#[test]
fn explicit_missing_config_is_an_error() {
    let err = ConfigLoader::resolve(
        Some("/nonexistent/covid-compare.json"),
        ConfigOverrides::default(),
        today(),
    )
    .unwrap_err();
    assert!(matches!(err, CompareError::ConfigRead(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let overrides = ConfigOverrides {
        as_of_date: Some("yesterday".to_string()),
        ..ConfigOverrides::default()
    };
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("empty.json");
    std::fs::write(&path, "{}").unwrap();
    let err = ConfigLoader::resolve(Some(path.to_str().unwrap()), overrides, today()).unwrap_err();
    assert!(matches!(err, CompareError::InvalidDate(_)));

    std::fs::write(&path, r#"{"comparison_countries": ["USA", "U5A"]}"#).unwrap();
    let err = ConfigLoader::resolve(
        Some(path.to_str().unwrap()),
        ConfigOverrides::default(),
        today(),
    )
    .unwrap_err();
    assert!(matches!(err, CompareError::InvalidCountryCode(_)));
}

#[test]
fn default_country_list_is_the_standard_selection() {
    let codes: Vec<String> = default_comparison_countries()
        .iter()
        .map(|code| code.to_string())
        .collect();
    assert_eq!(
        codes,
        vec!["AUS", "TWN", "KOR", "DEU", "USA", "IRN", "ESP", "ITA"]
    );
}
