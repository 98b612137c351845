use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CompareError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_string())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CountryCode {
    type Err = CompareError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        let is_valid =
            normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());
        if !is_valid {
            return Err(CompareError::InvalidCountryCode(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CompareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

/// One spreadsheet row after date normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub country: CountryCode,
    pub date: NaiveDate,
    pub new_cases: u64,
    pub new_deaths: u64,
    pub population: Option<u64>,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, CompareError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CompareError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_country_code_valid() {
        let code: CountryCode = " kor ".parse().unwrap();
        assert_eq!(code.as_str(), "KOR");
    }

    #[test]
    fn parse_country_code_invalid() {
        let err = "KO1".parse::<CountryCode>().unwrap_err();
        assert_matches!(err, CompareError::InvalidCountryCode(_));
        let err = "KORE".parse::<CountryCode>().unwrap_err();
        assert_matches!(err, CompareError::InvalidCountryCode(_));
    }

    #[test]
    fn parse_date_iso() {
        let date = parse_date("2020-04-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
        assert_matches!(parse_date("04/01/2020"), Err(CompareError::InvalidDate(_)));
    }
}
