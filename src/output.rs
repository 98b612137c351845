use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::compare::ComparisonReport;
use crate::present::render_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Table,
    Json,
    Chart,
}

pub struct TableOutput;

impl TableOutput {
    pub fn print_report(report: &ComparisonReport) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(render_table(report).as_bytes())?;
        Ok(())
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &ComparisonReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
