use camino::Utf8Path;
use chrono::NaiveDate;

use covid_compare::dataset::{DatasetTable, RawCell};
use covid_compare::domain::{CountryCode, DailyRecord};
use covid_compare::error::AlignmentFault;

fn text(value: &str) -> RawCell {
    RawCell::Text(value.to_string())
}

fn code(value: &str) -> CountryCode {
    value.parse().unwrap()
}

#[test]
fn later_population_column_names_are_accepted() {
    let header = ["countryterritoryCode", "year", "month", "day", "cases", "deaths", "popData2019"]
        .into_iter()
        .map(text)
        .collect();
    let row = vec![
        text("swe"),
        RawCell::Number(2020.0),
        RawCell::Number(4.0),
        RawCell::Number(1.0),
        RawCell::Number(12.0),
        text("3"),
        RawCell::Number(10_230_185.0),
    ];
    let table = DatasetTable::from_rows(vec![header, row]).unwrap();
    let date = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
    let found = table.row_at(&code("SWE"), date).unwrap();
    assert_eq!(found.cumulative_cases, 12);
    assert_eq!(found.cumulative_deaths, 3);
    assert_eq!(found.population, Some(10_230_185));
}

#[test]
fn duplicate_days_are_merged_and_totals_restart_per_country() {
    let day = |d| NaiveDate::from_ymd_opt(2020, 3, d).unwrap();
    let record = |country: &str, date, cases, deaths| DailyRecord {
        country: code(country),
        date,
        new_cases: cases,
        new_deaths: deaths,
        population: Some(1_000_000),
    };
    let table = DatasetTable::from_records(vec![
        record("NOR", day(2), 5, 1),
        record("DNK", day(1), 7, 0),
        record("NOR", day(1), 2, 0),
        record("NOR", day(2), 1, 0),
    ]);

    let nor = table.series(&code("NOR")).unwrap();
    let totals: Vec<(u64, u64)> = nor
        .rows()
        .iter()
        .map(|row| (row.cumulative_cases, row.cumulative_deaths))
        .collect();
    assert_eq!(totals, vec![(2, 0), (8, 1)]);
    assert_eq!(nor.rows()[1].deaths_per_case, Some(1.0 / 8.0));
    assert_eq!(nor.rows()[1].deaths_per_100k, Some(0.1));

    let dnk = table.series(&code("DNK")).unwrap();
    assert_eq!(dnk.rows()[0].cumulative_cases, 7);
    assert_eq!(table.countries().count(), 2);
}

#[test]
fn workbook_is_loaded_from_first_sheet() {
    let table = DatasetTable::load(Utf8Path::new("tests/fixtures/ecdc_sample.xlsx")).unwrap();
    let day = |month, d| NaiveDate::from_ymd_opt(2020, month, d).unwrap();

    let countries: Vec<&str> = table.countries().map(CountryCode::as_str).collect();
    assert_eq!(countries, vec!["ITA", "KOR"]);
    // Missing cases on ITA 03-09 and a conveyance row without a country code.
    assert_eq!(table.dropped_rows(), 2);

    let kor = table.series(&code("KOR")).unwrap();
    let dates: Vec<NaiveDate> = kor.rows().iter().map(|row| row.date).collect();
    assert_eq!(dates, vec![day(2, 29), day(3, 1), day(3, 2)]);
    let last = &kor.rows()[2];
    assert_eq!((last.cumulative_cases, last.cumulative_deaths), (200, 4));
    assert_eq!(last.population, Some(51_635_256));

    // Deaths for ITA 03-11 are stored as text in the sheet.
    let ita = table.row_at(&code("ITA"), day(3, 11)).unwrap();
    assert_eq!((ita.cumulative_cases, ita.cumulative_deaths), (100, 2));
    assert_eq!(table.origin(&code("ITA")), Ok(day(3, 10)));
    assert_eq!(table.origin(&code("KOR")), Ok(day(3, 1)));
}

#[test]
fn missing_workbook_is_an_error() {
    let err = DatasetTable::load(Utf8Path::new("tests/fixtures/absent.xlsx")).unwrap_err();
    assert!(err.to_string().contains("absent.xlsx"));
}

#[test]
fn origin_distinguishes_unknown_and_caseless_countries() {
    let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    let table = DatasetTable::from_records(vec![DailyRecord {
        country: code("NZL"),
        date,
        new_cases: 0,
        new_deaths: 0,
        population: Some(4_885_500),
    }]);
    assert_eq!(
        table.origin(&code("NZL")),
        Err(AlignmentFault::NoRecordedCases(code("NZL")))
    );
    assert_eq!(
        table.origin(&code("FJI")),
        Err(AlignmentFault::CountryNotFound(code("FJI")))
    );
}

#[test]
fn oversized_counts_saturate_instead_of_overflowing() {
    let day = |d| NaiveDate::from_ymd_opt(2020, 3, d).unwrap();
    let record = |date, cases| DailyRecord {
        country: code("CHE"),
        date,
        new_cases: cases,
        new_deaths: 0,
        population: None,
    };
    let table = DatasetTable::from_records(vec![
        record(day(1), u64::MAX),
        record(day(1), 5),
        record(day(2), 7),
    ]);
    let rows = table.series(&code("CHE")).unwrap().rows();
    assert_eq!(rows[0].new_cases, u64::MAX);
    assert_eq!(rows[1].cumulative_cases, u64::MAX);
}
