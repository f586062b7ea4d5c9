use std::time::{Duration, Instant};
use tracing::{info, instrument};

use crate::error::Result;
use crate::observability::metrics;
use crate::parser::{ExportParser, PopBioJsonParser};
use crate::types::RawRecord;

/// Downloads one page of a PopBio search export. Single request; no retry,
/// authentication or pagination.
pub struct VectorBaseClient {
    client: reqwest::Client,
}

impl VectorBaseClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scan_dwc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the raw JSON body.
    #[instrument(skip(self))]
    pub async fn fetch_export(&self, url: &str) -> Result<Vec<u8>> {
        let started = Instant::now();
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        metrics::ingest::fetch_duration(started.elapsed().as_secs_f64());
        info!("Fetched {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Fetch and parse into raw records.
    pub async fn fetch_records(&self, url: &str) -> Result<Vec<RawRecord>> {
        let bytes = self.fetch_export(url).await?;
        PopBioJsonParser.parse(&bytes)
    }
}
