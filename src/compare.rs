use chrono::NaiveDate;
use serde::Serialize;

use crate::align::{Alignment, align};
use crate::dataset::{CountrySeries, DatasetTable, SeriesRow};
use crate::domain::CountryCode;
use crate::error::AlignmentFault;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaPoint {
    pub date: NaiveDate,
    pub delta_cases: Option<f64>,
    pub delta_population: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub country: CountryCode,
    pub population: Option<u64>,
    pub date: NaiveDate,
    pub cumulative_cases: u64,
    pub cumulative_deaths: u64,
    pub delta_cases: Option<f64>,
    pub delta_population: Option<f64>,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CountryComparison {
    Compared(ComparisonRow),
    Fault { country: CountryCode, message: String },
}

impl CountryComparison {
    pub fn country(&self) -> &CountryCode {
        match self {
            CountryComparison::Compared(row) => &row.country,
            CountryComparison::Fault { country, .. } => country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub reference_country: CountryCode,
    pub report_date: NaiveDate,
    pub as_of_date: NaiveDate,
    pub countries: Vec<CountryComparison>,
}

/// Excess deaths implied by the case count had the country died at the
/// reference rate.
pub fn delta_cases(row: &SeriesRow, reference_dc: Option<f64>) -> Option<f64> {
    let dc = row.deaths_per_case?;
    let reference_dc = reference_dc?;
    Some(row.cumulative_cases as f64 * (dc - reference_dc))
}

/// Population-normalized relative delta. A zero per-capita rate means no
/// deaths yet, which resolves to zero.
pub fn delta_population(row: &SeriesRow, reference_dp: Option<f64>) -> Option<f64> {
    let dp = row.deaths_per_100k?;
    let reference_dp = reference_dp?;
    if dp == 0.0 {
        return Some(0.0);
    }
    Some(row.cumulative_deaths as f64 * (dp - reference_dp) / dp)
}

/// Deltas for every day of the target series against one reference row.
pub fn compare_series(target: &CountrySeries, reference_row: &SeriesRow) -> Vec<DeltaPoint> {
    target
        .rows()
        .iter()
        .map(|row| DeltaPoint {
            date: row.date,
            delta_cases: delta_cases(row, reference_row.deaths_per_case),
            delta_population: delta_population(row, reference_row.deaths_per_100k),
        })
        .collect()
}

pub fn compare(country: &CountryCode, alignment: &Alignment<'_>) -> ComparisonRow {
    let row = alignment.target_row;
    let reference = alignment.reference_row;
    ComparisonRow {
        country: country.clone(),
        population: row.population,
        date: row.date,
        cumulative_cases: row.cumulative_cases,
        cumulative_deaths: row.cumulative_deaths,
        delta_cases: delta_cases(row, reference.deaths_per_case),
        delta_population: delta_population(row, reference.deaths_per_100k),
        days: alignment.epidemic_age,
    }
}

/// Aligns and compares one country, keeping the full delta history for
/// charting.
pub fn compare_country(
    table: &DatasetTable,
    reference: &CountryCode,
    target: &CountryCode,
    as_of: NaiveDate,
) -> Result<(ComparisonRow, Vec<DeltaPoint>), AlignmentFault> {
    let alignment = align(table, reference, target, as_of)?;
    let series = table
        .series(target)
        .ok_or_else(|| AlignmentFault::CountryNotFound(target.clone()))?;
    Ok((
        compare(series.country(), &alignment),
        compare_series(series, alignment.reference_row),
    ))
}

/// Builds the report; a country that cannot be aligned is recorded as a
/// fault and does not stop the others.
pub fn build_report(
    table: &DatasetTable,
    reference: &CountryCode,
    countries: &[CountryCode],
    report_date: NaiveDate,
    as_of: NaiveDate,
) -> ComparisonReport {
    let countries = countries
        .iter()
        .map(|country| match align(table, reference, country, as_of) {
            Ok(alignment) => CountryComparison::Compared(compare(country, &alignment)),
            Err(fault) => {
                tracing::warn!(%country, %fault, "skipping country");
                CountryComparison::Fault {
                    country: country.clone(),
                    message: fault.to_string(),
                }
            }
        })
        .collect();

    ComparisonReport {
        reference_country: reference.clone(),
        report_date,
        as_of_date: as_of,
        countries,
    }
}
