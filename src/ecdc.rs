use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::CompareError;

const ECDC_HOST: &str = "www.ecdc.europa.eu";
const ECDC_DATA_PATH: &str = "sites/default/files/documents";

pub trait DatasetClient {
    /// Downloads the named report and returns its raw bytes.
    fn download(&self, file_name: &str) -> Result<Vec<u8>, CompareError>;
}

#[derive(Clone)]
pub struct EcdcHttpClient {
    client: Client,
}

impl EcdcHttpClient {
    pub fn new() -> Result<Self, CompareError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("covid-compare/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| CompareError::FetchHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| CompareError::FetchHttp(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn dataset_url(file_name: &str) -> String {
        format!("https://{ECDC_HOST}/{ECDC_DATA_PATH}/{file_name}")
    }

    fn handle_status(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, CompareError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(CompareError::FetchStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        })
    }
}

impl DatasetClient for EcdcHttpClient {
    fn download(&self, file_name: &str) -> Result<Vec<u8>, CompareError> {
        let url = Self::dataset_url(file_name);
        tracing::info!(%url, "downloading report");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| CompareError::FetchHttp(err.to_string()))?;
        let response = Self::handle_status(&url, response)?;
        let bytes = response
            .bytes()
            .map_err(|err| CompareError::FetchHttp(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_url_layout() {
        let url = EcdcHttpClient::dataset_url("report.xlsx");
        assert_eq!(
            url,
            "https://www.ecdc.europa.eu/sites/default/files/documents/report.xlsx"
        );
    }
}
