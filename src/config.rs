use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{CountryCode, parse_date};
use crate::error::CompareError;

pub const DEFAULT_CONFIG_FILE: &str = "covid-compare.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub reference_country: Option<String>,
    #[serde(default)]
    pub as_of_date: Option<String>,
    #[serde(default)]
    pub report_date: Option<String>,
    #[serde(default)]
    pub comparison_countries: Option<Vec<String>>,
    #[serde(default)]
    pub cache_dir: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub reference_country: Option<String>,
    pub as_of_date: Option<String>,
    pub report_date: Option<String>,
    pub comparison_countries: Option<Vec<String>>,
    pub cache_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub reference_country: CountryCode,
    pub as_of_date: NaiveDate,
    pub report_date: NaiveDate,
    pub comparison_countries: Vec<CountryCode>,
    pub cache_dir: Utf8PathBuf,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads the config file (an explicit path must exist, the default one is
    /// optional) and applies the overrides on top of it.
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
        today: NaiveDate,
    ) -> Result<ResolvedConfig, CompareError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|_| CompareError::ConfigRead(config_path.display().to_string()))?;
            serde_json::from_str(&content)
                .map_err(|err| CompareError::ConfigParse(err.to_string()))?
        };

        Self::resolve_config(config.merge(overrides), today)
    }

    pub fn resolve_config(config: Config, today: NaiveDate) -> Result<ResolvedConfig, CompareError> {
        let reference_country = match config.reference_country {
            Some(value) => value.parse()?,
            None => default_reference_country(),
        };

        let as_of_date = match config.as_of_date {
            Some(value) => parse_date(&value)?,
            None => today,
        };

        let report_date = match config.report_date {
            Some(value) => parse_date(&value)?,
            None => as_of_date,
        };

        let comparison_countries = match config.comparison_countries {
            Some(values) => values
                .iter()
                .map(|value| value.parse())
                .collect::<Result<Vec<CountryCode>, CompareError>>()?,
            None => default_comparison_countries(),
        };

        let cache_dir = match config.cache_dir {
            Some(dir) => Utf8PathBuf::from(dir),
            None => default_cache_dir()?,
        };

        Ok(ResolvedConfig {
            reference_country,
            as_of_date,
            report_date,
            comparison_countries,
            cache_dir,
        })
    }
}

impl Config {
    pub fn merge(self, overrides: ConfigOverrides) -> Self {
        Self {
            reference_country: overrides.reference_country.or(self.reference_country),
            as_of_date: overrides.as_of_date.or(self.as_of_date),
            report_date: overrides.report_date.or(self.report_date),
            comparison_countries: overrides
                .comparison_countries
                .or(self.comparison_countries),
            cache_dir: overrides.cache_dir.or(self.cache_dir),
        }
    }
}

pub fn default_reference_country() -> CountryCode {
    CountryCode::from_static("KOR")
}

pub fn default_comparison_countries() -> Vec<CountryCode> {
    ["AUS", "TWN", "KOR", "DEU", "USA", "IRN", "ESP", "ITA"]
        .into_iter()
        .map(CountryCode::from_static)
        .collect()
}

fn default_cache_dir() -> Result<Utf8PathBuf, CompareError> {
    let cwd = std::env::current_dir().map_err(|err| CompareError::Filesystem(err.to_string()))?;
    Utf8PathBuf::from_path_buf(cwd.join("data"))
        .map_err(|_| CompareError::Filesystem("invalid cache path".to_string()))
}
