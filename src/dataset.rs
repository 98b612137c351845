use std::collections::BTreeMap;

use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook};
use camino::Utf8Path;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CountryCode, DailyRecord};
use crate::error::{AlignmentFault, CompareError, DataQualityFault};

const COL_DAY: &str = "day";
const COL_MONTH: &str = "month";
const COL_YEAR: &str = "year";
const COL_CASES: &str = "cases";
const COL_DEATHS: &str = "deaths";
const COL_COUNTRY: &str = "countryterritoryCode";
const COL_POPULATION_PREFIX: &str = "popData";

static EMPTY_CELL: RawCell = RawCell::Empty;

/// A spreadsheet cell reduced to what the loader cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl From<&Data> for RawCell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => RawCell::Empty,
            Data::Int(value) => RawCell::Number(*value as f64),
            Data::Float(value) => RawCell::Number(*value),
            Data::String(value) => RawCell::Text(value.clone()),
            other => RawCell::Text(other.to_string()),
        }
    }
}

impl RawCell {
    fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawCell::Empty => return None,
            RawCell::Number(value) => *value,
            RawCell::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn as_count(&self) -> Option<u64> {
        self.as_number()
            .filter(|value| *value >= 0.0 && value.fract() == 0.0)
            .map(|value| value as u64)
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            RawCell::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    day: usize,
    month: usize,
    year: usize,
    cases: usize,
    deaths: usize,
    country: usize,
    population: usize,
}

impl ColumnIndex {
    fn from_header(header: &[RawCell]) -> Result<Self, CompareError> {
        let names: Vec<&str> = header
            .iter()
            .map(|cell| cell.as_text().map(str::trim).unwrap_or_default())
            .collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|candidate| *candidate == name)
                .ok_or_else(|| CompareError::MissingColumn(name.to_string()))
        };
        let population = names
            .iter()
            .position(|candidate| candidate.starts_with(COL_POPULATION_PREFIX))
            .ok_or_else(|| CompareError::MissingColumn(format!("{COL_POPULATION_PREFIX}*")))?;

        Ok(Self {
            day: find(COL_DAY)?,
            month: find(COL_MONTH)?,
            year: find(COL_YEAR)?,
            cases: find(COL_CASES)?,
            deaths: find(COL_DEATHS)?,
            country: find(COL_COUNTRY)?,
            population,
        })
    }

    fn parse_row(&self, row: &[RawCell]) -> Result<DailyRecord, DataQualityFault> {
        let cell = |index: usize| row.get(index).unwrap_or(&EMPTY_CELL);

        let country = cell(self.country)
            .as_text()
            .and_then(|text| text.parse::<CountryCode>().ok())
            .ok_or(DataQualityFault::MissingCountry)?;

        let component = |index: usize| {
            cell(index)
                .as_count()
                .and_then(|value| u32::try_from(value).ok())
        };
        let date = match (component(self.year), component(self.month), component(self.day)) {
            (Some(year), Some(month), Some(day)) => {
                i32::try_from(year)
                    .ok()
                    .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
            }
            _ => None,
        }
        .ok_or(DataQualityFault::InvalidDate)?;

        let new_cases = cell(self.cases)
            .as_count()
            .ok_or(DataQualityFault::InvalidCount(COL_CASES))?;
        let new_deaths = cell(self.deaths)
            .as_count()
            .ok_or(DataQualityFault::InvalidCount(COL_DEATHS))?;

        Ok(DailyRecord {
            country,
            date,
            new_cases,
            new_deaths,
            population: cell(self.population).as_count(),
        })
    }
}

/// One day of a country's series with its running totals and ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub new_cases: u64,
    pub new_deaths: u64,
    pub population: Option<u64>,
    pub cumulative_cases: u64,
    pub cumulative_deaths: u64,
    /// Undefined until the first case is recorded.
    pub deaths_per_case: Option<f64>,
    /// Undefined when the population is unknown or zero.
    pub deaths_per_100k: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    country: CountryCode,
    rows: Vec<SeriesRow>,
}

impl CountrySeries {
    /// Builds the series from one country's records, already sorted by date.
    fn from_sorted(country: CountryCode, records: &[DailyRecord]) -> Self {
        let mut cumulative_cases = 0u64;
        let mut cumulative_deaths = 0u64;
        let rows = records
            .iter()
            .map(|record| {
                cumulative_cases = cumulative_cases.saturating_add(record.new_cases);
                cumulative_deaths = cumulative_deaths.saturating_add(record.new_deaths);
                SeriesRow {
                    date: record.date,
                    new_cases: record.new_cases,
                    new_deaths: record.new_deaths,
                    population: record.population,
                    cumulative_cases,
                    cumulative_deaths,
                    deaths_per_case: deaths_per_case(cumulative_deaths, cumulative_cases),
                    deaths_per_100k: deaths_per_100k(cumulative_deaths, record.population),
                }
            })
            .collect();
        Self { country, rows }
    }

    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn row_at(&self, date: NaiveDate) -> Option<&SeriesRow> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|index| &self.rows[index])
    }

    /// Earliest date with a nonzero cumulative case count.
    pub fn first_case_date(&self) -> Option<NaiveDate> {
        self.rows
            .iter()
            .find(|row| row.cumulative_cases != 0)
            .map(|row| row.date)
    }
}

pub fn deaths_per_case(cumulative_deaths: u64, cumulative_cases: u64) -> Option<f64> {
    (cumulative_cases != 0).then(|| cumulative_deaths as f64 / cumulative_cases as f64)
}

pub fn deaths_per_100k(cumulative_deaths: u64, population: Option<u64>) -> Option<f64> {
    population
        .filter(|population| *population != 0)
        .map(|population| cumulative_deaths as f64 / (population as f64 / 100_000.0))
}

/// Day zero of every loaded country; `None` for countries without cases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpidemicOrigins(BTreeMap<CountryCode, Option<NaiveDate>>);

impl EpidemicOrigins {
    pub fn lookup(&self, country: &CountryCode) -> Result<NaiveDate, AlignmentFault> {
        match self.0.get(country) {
            None => Err(AlignmentFault::CountryNotFound(country.clone())),
            Some(None) => Err(AlignmentFault::NoRecordedCases(country.clone())),
            Some(Some(date)) => Ok(*date),
        }
    }
}

/// The loaded report: one series per country plus derived origins.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetTable {
    series: BTreeMap<CountryCode, CountrySeries>,
    origins: EpidemicOrigins,
    dropped_rows: usize,
}

impl DatasetTable {
    pub fn load(path: &Utf8Path) -> Result<Self, CompareError> {
        let mut workbook: Xlsx<_> = open_workbook(path.as_std_path())
            .map_err(|err: XlsxError| CompareError::Workbook(format!("{path}: {err}")))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CompareError::Workbook(format!("{path}: no worksheets")))?
            .map_err(|err| CompareError::Workbook(format!("{path}: {err}")))?;
        Self::from_rows(
            range
                .rows()
                .map(|row| row.iter().map(RawCell::from).collect::<Vec<_>>()),
        )
    }

    /// Parses a header row followed by data rows. Malformed rows are dropped
    /// and counted; a missing population only blanks the per-capita ratio.
    pub fn from_rows<I>(rows: I) -> Result<Self, CompareError>
    where
        I: IntoIterator<Item = Vec<RawCell>>,
    {
        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| CompareError::Workbook("worksheet is empty".to_string()))?;
        let columns = ColumnIndex::from_header(&header)?;

        let mut records = Vec::new();
        let mut dropped_rows = 0usize;
        for (index, row) in rows.enumerate() {
            if row.iter().all(|cell| *cell == RawCell::Empty) {
                continue;
            }
            match columns.parse_row(&row) {
                Ok(record) => records.push(record),
                Err(fault) => {
                    dropped_rows += 1;
                    tracing::warn!(row = index + 2, %fault, "dropping spreadsheet row");
                }
            }
        }

        let mut table = Self::from_records(records);
        table.dropped_rows = dropped_rows;
        tracing::info!(
            countries = table.series.len(),
            dropped_rows,
            "loaded dataset"
        );
        Ok(table)
    }

    /// Sorts by country then date, merges duplicate days and derives the
    /// cumulative columns independently per country.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by(|a, b| (&a.country, a.date).cmp(&(&b.country, b.date)));

        let mut merged: Vec<DailyRecord> = Vec::with_capacity(records.len());
        for record in records {
            match merged.last_mut() {
                Some(last) if last.country == record.country && last.date == record.date => {
                    last.new_cases = last.new_cases.saturating_add(record.new_cases);
                    last.new_deaths = last.new_deaths.saturating_add(record.new_deaths);
                    last.population = last.population.or(record.population);
                }
                _ => merged.push(record),
            }
        }

        let mut series = BTreeMap::new();
        for group in merged.chunk_by(|a, b| a.country == b.country) {
            let country = group[0].country.clone();
            series.insert(country.clone(), CountrySeries::from_sorted(country, group));
        }

        let origins = EpidemicOrigins(
            series
                .iter()
                .map(|(country, series)| (country.clone(), series.first_case_date()))
                .collect(),
        );

        Self {
            series,
            origins,
            dropped_rows: 0,
        }
    }

    pub fn series(&self, country: &CountryCode) -> Option<&CountrySeries> {
        self.series.get(country)
    }

    pub fn row_at(&self, country: &CountryCode, date: NaiveDate) -> Option<&SeriesRow> {
        self.series(country).and_then(|series| series.row_at(date))
    }

    pub fn origins(&self) -> &EpidemicOrigins {
        &self.origins
    }

    pub fn origin(&self, country: &CountryCode) -> Result<NaiveDate, AlignmentFault> {
        self.origins.lookup(country)
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.series.keys()
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}
