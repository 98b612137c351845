use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use covid_compare::app::App;
use covid_compare::chart::ChartOptions;
use covid_compare::config::{ConfigLoader, ConfigOverrides};
use covid_compare::domain::CountryCode;
use covid_compare::ecdc::EcdcHttpClient;
use covid_compare::error::CompareError;
use covid_compare::output::{JsonOutput, OutputMode, TableOutput};
use covid_compare::store::Store;

#[derive(Parser)]
#[command(name = "covid-compare")]
#[command(about = "Compare COVID-19 fatality trajectories against a reference country")]
#[command(version, author)]
struct Cli {
    #[arg(long, help = "Path to a JSON config file (default: covid-compare.json if present)")]
    config: Option<String>,

    #[arg(long, help = "Reference country code (default: KOR)")]
    reference: Option<String>,

    #[arg(long, help = "Comparison date, YYYY-MM-DD (default: today)")]
    as_of: Option<String>,

    #[arg(long, help = "Report publication date, YYYY-MM-DD (default: --as-of)")]
    report_date: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Comma separated comparison country codes")]
    countries: Option<Vec<String>>,

    #[arg(long, help = "Directory holding downloaded reports (default: ./data)")]
    cache_dir: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    output: OutputMode,

    #[arg(long, help = "Country to chart with --output chart (default: first comparison country)")]
    chart_country: Option<String>,

    #[arg(long, default_value = "charts/delta.png")]
    chart_path: Utf8PathBuf,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<CompareError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CompareError) -> u8 {
    match error {
        CompareError::FetchStatus { .. } | CompareError::FetchHttp(_) => 3,
        CompareError::ConfigRead(_)
        | CompareError::ConfigParse(_)
        | CompareError::InvalidCountryCode(_)
        | CompareError::InvalidDate(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        reference_country: cli.reference,
        as_of_date: cli.as_of,
        report_date: cli.report_date,
        comparison_countries: cli.countries,
        cache_dir: cli.cache_dir,
    };
    let today = chrono::Local::now().date_naive();
    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides, today)?;

    let client = EcdcHttpClient::new()?;
    let app = App::new(Store::new(config.cache_dir.clone()), client);

    match cli.output {
        OutputMode::Table => {
            let report = app.compare(&config)?;
            TableOutput::print_report(&report).into_diagnostic()?;
        }
        OutputMode::Json => {
            let report = app.compare(&config)?;
            JsonOutput::print_report(&report).into_diagnostic()?;
        }
        OutputMode::Chart => {
            let country = match cli.chart_country {
                Some(value) => value.parse::<CountryCode>()?,
                None => config
                    .comparison_countries
                    .first()
                    .cloned()
                    .ok_or_else(|| miette::Report::msg("no comparison country to chart"))?,
            };
            app.chart(&config, &country, &cli.chart_path, ChartOptions::default())?;
            println!("{}", cli.chart_path);
        }
    }
    Ok(())
}
