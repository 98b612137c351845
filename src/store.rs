use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use tempfile::Builder;

use crate::error::CompareError;

const DATASET_FILE_PREFIX: &str = "COVID-19-geographic-disbtribution-worldwide-";
const DATASET_FILE_EXT: &str = "xlsx";

/// Local cache of downloaded ECDC reports. A file's presence is the only
/// cache-hit signal; its content is never verified.
#[derive(Debug, Clone)]
pub struct Store {
    cache_root: Utf8PathBuf,
}

impl Store {
    pub fn new(cache_root: Utf8PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Utf8Path {
        &self.cache_root
    }

    pub fn dataset_path(&self, report_date: NaiveDate) -> Utf8PathBuf {
        self.cache_root.join(dataset_file_name(report_date))
    }

    pub fn ensure_cache_root(&self) -> Result<(), CompareError> {
        fs::create_dir_all(self.cache_root.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))
    }

    pub fn cache_exists(&self, path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), CompareError> {
        let parent = path
            .parent()
            .ok_or_else(|| CompareError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        let temp = Builder::new()
            .prefix("covid-compare-download")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        fs::write(temp.path(), content).map_err(|err| CompareError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

pub fn dataset_file_name(report_date: NaiveDate) -> String {
    format!(
        "{DATASET_FILE_PREFIX}{}.{DATASET_FILE_EXT}",
        report_date.format("%Y-%m-%d")
    )
}
