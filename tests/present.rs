use chrono::NaiveDate;

use covid_compare::compare::{ComparisonReport, ComparisonRow, CountryComparison};
use covid_compare::domain::CountryCode;
use covid_compare::present::{FIELDS, MISSING_CELL, render_table, table_rows};

fn code(value: &str) -> CountryCode {
    value.parse().unwrap()
}

fn report() -> ComparisonReport {
    let date = NaiveDate::from_ymd_opt(2020, 3, 31).unwrap();
    ComparisonReport {
        reference_country: code("KOR"),
        report_date: date,
        as_of_date: date,
        countries: vec![
            CountryComparison::Compared(ComparisonRow {
                country: code("ITA"),
                population: Some(60_431_283),
                date,
                cumulative_cases: 101_739,
                cumulative_deaths: 11_591,
                delta_cases: Some(9_849.6),
                delta_population: None,
                days: 61,
            }),
            CountryComparison::Fault {
                country: code("XXX"),
                message: "country XXX is not present in the dataset".to_string(),
            },
        ],
    }
}

#[test]
fn compared_rows_are_formatted_by_field_table() {
    let rows = table_rows(&report());
    assert_eq!(rows[0].len(), FIELDS.len() + 1);
    assert_eq!(
        &rows[0][..FIELDS.len()],
        &[
            "ITA",
            "60,431,283",
            "2020-03-31",
            "101,739",
            "11,591",
            "9,850",
            MISSING_CELL,
            "61"
        ]
    );
}

#[test]
fn faulted_rows_are_marked_missing() {
    let rows = table_rows(&report());
    assert_eq!(rows[1][0], "XXX");
    assert!(rows[1][1..FIELDS.len()].iter().all(|cell| cell == MISSING_CELL));
    assert!(rows[1].last().unwrap().contains("not present"));
}

#[test]
fn rendered_table_has_title_and_labels() {
    let text = render_table(&report());
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Comparison of COVID-19 fatalities relative to KOR")
    );
    let header = lines.next().unwrap();
    for spec in FIELDS {
        assert!(header.contains(spec.label));
    }
    assert_eq!(text.lines().count(), 5);
}
