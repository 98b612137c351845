use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::compare::{ComparisonReport, ComparisonRow, CountryComparison};

pub const MISSING_CELL: &str = "—";

/// A single table cell before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Identity,
    Round,
    DateOnly,
}

impl FieldFormat {
    pub fn apply(self, value: &CellValue) -> String {
        match (self, value) {
            (_, CellValue::Missing) => MISSING_CELL.to_string(),
            (FieldFormat::Round, CellValue::Number(number)) => {
                if number.is_finite() {
                    group_thousands(number.round() as i64)
                } else {
                    MISSING_CELL.to_string()
                }
            }
            (FieldFormat::DateOnly, CellValue::Date(date)) => date.format("%Y-%m-%d").to_string(),
            (_, CellValue::Text(text)) => text.clone(),
            (_, CellValue::Number(number)) => number.to_string(),
            (_, CellValue::Date(date)) => date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub format: FieldFormat,
}

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "country",
        label: "Country",
        format: FieldFormat::Identity,
    },
    FieldSpec {
        key: "population",
        label: "Pop",
        format: FieldFormat::Round,
    },
    FieldSpec {
        key: "date",
        label: "Comp. Date",
        format: FieldFormat::DateOnly,
    },
    FieldSpec {
        key: "cumulative_cases",
        label: "Cases",
        format: FieldFormat::Round,
    },
    FieldSpec {
        key: "cumulative_deaths",
        label: "Deaths",
        format: FieldFormat::Round,
    },
    FieldSpec {
        key: "delta_cases",
        label: "ΔComp (C)",
        format: FieldFormat::Round,
    },
    FieldSpec {
        key: "delta_population",
        label: "ΔComp (P)",
        format: FieldFormat::Round,
    },
    FieldSpec {
        key: "days",
        label: "Days",
        format: FieldFormat::Round,
    },
];

pub fn field(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

impl ComparisonRow {
    pub fn value(&self, key: &str) -> CellValue {
        let optional = |value: Option<f64>| value.map_or(CellValue::Missing, CellValue::Number);
        match key {
            "country" => CellValue::Text(self.country.to_string()),
            "population" => optional(self.population.map(|value| value as f64)),
            "date" => CellValue::Date(self.date),
            "cumulative_cases" => CellValue::Number(self.cumulative_cases as f64),
            "cumulative_deaths" => CellValue::Number(self.cumulative_deaths as f64),
            "delta_cases" => optional(self.delta_cases),
            "delta_population" => optional(self.delta_population),
            "days" => CellValue::Number(self.days as f64),
            _ => CellValue::Missing,
        }
    }
}

/// Formats an integer with `,` between groups of three digits.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn table_title(report: &ComparisonReport) -> String {
    format!(
        "Comparison of COVID-19 fatalities relative to {}",
        report.reference_country
    )
}

/// Formatted cells for every configured country, in configuration order.
/// Faulted countries keep their code and show the fault in the last column.
pub fn table_rows(report: &ComparisonReport) -> Vec<Vec<String>> {
    report
        .countries
        .iter()
        .map(|entry| match entry {
            CountryComparison::Compared(row) => {
                let mut cells: Vec<String> = FIELDS
                    .iter()
                    .map(|spec| spec.format.apply(&row.value(spec.key)))
                    .collect();
                cells.push(String::new());
                cells
            }
            CountryComparison::Fault { message, .. } => {
                let mut cells = vec![entry.country().to_string()];
                cells.extend(FIELDS.iter().skip(1).map(|_| MISSING_CELL.to_string()));
                cells.push(message.clone());
                cells
            }
        })
        .collect()
}

pub fn render_table(report: &ComparisonReport) -> String {
    let mut header: Vec<String> = FIELDS.iter().map(|spec| spec.label.to_string()).collect();
    header.push("Note".to_string());
    let rows = table_rows(report);

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", table_title(report));
    write_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_line(&mut out, &rule, &widths);
    for row in &rows {
        write_line(&mut out, row, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            if index == 0 || index == cells.len() - 1 {
                format!("{cell}{}", " ".repeat(pad))
            } else {
                format!("{}{cell}", " ".repeat(pad))
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
