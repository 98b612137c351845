use camino::Utf8Path;
use chrono::NaiveDate;
use plotters::prelude::*;

use crate::compare::DeltaPoint;
use crate::domain::CountryCode;
use crate::error::CompareError;

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// One named line: (days since the first plotted date, value).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub points: Vec<(i64, f64)>,
}

/// Splits the delta history into the two plotted lines, skipping undefined
/// values. Returns the first date as the x-axis origin.
pub fn delta_lines(points: &[DeltaPoint]) -> Option<(NaiveDate, Vec<ChartSeries>)> {
    let start = points.first()?.date;
    let line = |label: &'static str, pick: fn(&DeltaPoint) -> Option<f64>| ChartSeries {
        label,
        points: points
            .iter()
            .filter_map(|point| pick(point).map(|value| ((point.date - start).num_days(), value)))
            .collect(),
    };
    Some((
        start,
        vec![
            line("ΔComp (C)", |point: &DeltaPoint| point.delta_cases),
            line("ΔComp (P)", |point: &DeltaPoint| point.delta_population),
        ],
    ))
}

fn value_range(lines: &[ChartSeries]) -> (f64, f64) {
    let (min, max) = lines
        .iter()
        .flat_map(|line| line.points.iter().map(|(_, value)| *value))
        .fold((0.0f64, 0.0f64), |(min, max), value| {
            (min.min(value), max.max(value))
        });
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad, max + pad)
}

pub fn render_delta_chart(
    country: &CountryCode,
    reference: &CountryCode,
    points: &[DeltaPoint],
    output_path: &Utf8Path,
    options: ChartOptions,
) -> Result<(), CompareError> {
    let (start, lines) = delta_lines(points)
        .ok_or_else(|| CompareError::Chart(format!("no data for {country}")))?;
    let span = points
        .last()
        .map(|point| (point.date - start).num_days())
        .unwrap_or_default()
        .max(1);
    let (min_value, max_value) = value_range(&lines);

    if let Some(parent) = output_path.parent() {
        if !parent.as_str().is_empty() {
            std::fs::create_dir_all(parent.as_std_path())
                .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        }
    }

    let root = BitMapBackend::new(output_path.as_std_path(), (options.width, options.height))
        .into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| CompareError::Chart(format!("Failed to fill background: {e}")))?;

    let title = format!("{country}: projected deaths relative to {reference}");
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0i64..span, min_value..max_value)
        .map_err(|e| CompareError::Chart(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Δ deaths")
        .x_label_formatter(&|x: &i64| {
            (start + chrono::Duration::days(*x))
                .format("%m-%d")
                .to_string()
        })
        .draw()
        .map_err(|e| CompareError::Chart(format!("Failed to configure mesh: {e}")))?;

    for (line, color) in lines.iter().zip([BLUE, RED]) {
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), &color))
            .map_err(|e| CompareError::Chart(format!("Failed to draw {}: {e}", line.label)))?
            .label(line.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .margin(10)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| CompareError::Chart(format!("Failed to draw legend: {e}")))?;

    root.present()
        .map_err(|e| CompareError::Chart(format!("Failed to present chart: {e}")))?;
    tracing::info!(path = %output_path, "wrote chart");
    Ok(())
}
