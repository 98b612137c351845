use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;

use crate::chart::{ChartOptions, render_delta_chart};
use crate::compare::{ComparisonReport, build_report, compare_country};
use crate::config::ResolvedConfig;
use crate::dataset::DatasetTable;
use crate::domain::CountryCode;
use crate::ecdc::DatasetClient;
use crate::error::CompareError;
use crate::store::{Store, dataset_file_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    Cache,
    Download,
}

#[derive(Debug, Clone)]
pub struct FetchedDataset {
    pub report_date: NaiveDate,
    pub path: Utf8PathBuf,
    pub action: FetchAction,
}

pub struct App<C: DatasetClient> {
    store: Store,
    client: C,
}

impl<C: DatasetClient> App<C> {
    pub fn new(store: Store, client: C) -> Self {
        Self { store, client }
    }

    /// Returns the cached report for `report_date`, downloading it first when
    /// it is not in the cache.
    pub fn get_dataset(&self, report_date: NaiveDate) -> Result<FetchedDataset, CompareError> {
        let path = self.store.dataset_path(report_date);
        if self.store.cache_exists(&path) {
            tracing::info!(%path, "using cached report");
            return Ok(FetchedDataset {
                report_date,
                path,
                action: FetchAction::Cache,
            });
        }

        self.store.ensure_cache_root()?;
        let bytes = self.client.download(&dataset_file_name(report_date))?;
        Store::write_bytes_atomic(&path, &bytes)?;
        tracing::info!(%path, bytes = bytes.len(), "cached report");
        Ok(FetchedDataset {
            report_date,
            path,
            action: FetchAction::Download,
        })
    }

    pub fn load_dataset(&self, report_date: NaiveDate) -> Result<DatasetTable, CompareError> {
        let fetched = self.get_dataset(report_date)?;
        DatasetTable::load(&fetched.path)
    }

    pub fn compare(&self, config: &ResolvedConfig) -> Result<ComparisonReport, CompareError> {
        let table = self.load_dataset(config.report_date)?;
        Ok(build_report(
            &table,
            &config.reference_country,
            &config.comparison_countries,
            config.report_date,
            config.as_of_date,
        ))
    }

    /// Draws the delta history of a single country against the reference.
    pub fn chart(
        &self,
        config: &ResolvedConfig,
        country: &CountryCode,
        output_path: &Utf8Path,
        options: ChartOptions,
    ) -> Result<(), CompareError> {
        let table = self.load_dataset(config.report_date)?;
        let (_, points) = compare_country(
            &table,
            &config.reference_country,
            country,
            config.as_of_date,
        )?;
        render_delta_chart(
            country,
            &config.reference_country,
            &points,
            output_path,
            options,
        )
    }
}
