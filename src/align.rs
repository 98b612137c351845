use chrono::NaiveDate;

use crate::dataset::{DatasetTable, SeriesRow};
use crate::domain::CountryCode;
use crate::error::AlignmentFault;

/// Calendar dates in the reference and target series that share the same
/// epidemic age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentDates {
    pub reference_date: NaiveDate,
    pub target_date: NaiveDate,
}

/// Places a target country on the reference timeline.
///
/// If the reference country has been exposed at least as long as the target
/// by `as_of`, the reference is read at the target's age and the target at
/// `as_of`. Otherwise the reference is read at `as_of` and the target is
/// rewound by the difference between the two origins.
pub fn alignment_dates(
    reference_origin: NaiveDate,
    target_origin: NaiveDate,
    as_of: NaiveDate,
) -> AlignmentDates {
    let target_elapsed = as_of - target_origin;
    let reference_elapsed = as_of - reference_origin;
    if reference_elapsed >= target_elapsed {
        AlignmentDates {
            reference_date: reference_origin + target_elapsed,
            target_date: as_of,
        }
    } else {
        AlignmentDates {
            reference_date: as_of,
            target_date: as_of - (reference_origin - target_origin),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment<'a> {
    pub dates: AlignmentDates,
    pub reference_row: &'a SeriesRow,
    pub target_row: &'a SeriesRow,
    /// Days since the target's first case, as of the requested date.
    pub epidemic_age: i64,
}

pub fn align<'a>(
    table: &'a DatasetTable,
    reference: &CountryCode,
    target: &CountryCode,
    as_of: NaiveDate,
) -> Result<Alignment<'a>, AlignmentFault> {
    let target_origin = table.origin(target)?;
    let reference_origin = table.origin(reference)?;

    if as_of < target_origin {
        return Err(AlignmentFault::NotStarted {
            country: target.clone(),
            as_of,
        });
    }

    let dates = alignment_dates(reference_origin, target_origin, as_of);
    tracing::debug!(
        %reference,
        %target,
        reference_date = %dates.reference_date,
        target_date = %dates.target_date,
        "aligned timelines"
    );

    let reference_row = table
        .row_at(reference, dates.reference_date)
        .ok_or_else(|| AlignmentFault::DateOutOfRange {
            country: reference.clone(),
            date: dates.reference_date,
        })?;
    let target_row = table
        .row_at(target, dates.target_date)
        .ok_or_else(|| AlignmentFault::DateOutOfRange {
            country: target.clone(),
            date: dates.target_date,
        })?;

    Ok(Alignment {
        dates,
        reference_row,
        target_row,
        epidemic_age: (as_of - target_origin).num_days(),
    })
}
