use chrono::NaiveDate;
use miette::Diagnostic;
use thiserror::Error;

use crate::domain::CountryCode;

#[derive(Debug, Error, Diagnostic)]
pub enum CompareError {
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(String),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("ECDC request failed: {0}")]
    FetchHttp(String),

    #[error("failed to fetch {url}: server returned status {status}")]
    #[diagnostic(help("the report for this date may not be published yet; try an earlier --report-date"))]
    FetchStatus { url: String, status: u16 },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("workbook is missing required column: {0}")]
    MissingColumn(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error(transparent)]
    Alignment(#[from] AlignmentFault),
}

/// Per-country failure to place a country on the reference timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentFault {
    #[error("country {0} is not present in the dataset")]
    CountryNotFound(CountryCode),

    #[error("country {0} has no recorded cases")]
    NoRecordedCases(CountryCode),

    #[error("country {country} has no cases before {as_of}")]
    NotStarted {
        country: CountryCode,
        as_of: NaiveDate,
    },

    #[error("no data for {country} on {date}")]
    DateOutOfRange {
        country: CountryCode,
        date: NaiveDate,
    },
}

/// Reason a spreadsheet row was rejected by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataQualityFault {
    #[error("missing or invalid country code")]
    MissingCountry,

    #[error("invalid calendar date")]
    InvalidDate,

    #[error("missing or non-numeric {0}")]
    InvalidCount(&'static str),
}
