use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::apis::VectorBaseClient;
use crate::config::Settings;
use crate::error::Result;
use crate::infra::csv_output_adapter::StagedCsvSink;
use crate::parser::{self, InputFormat};
use crate::pipeline::sampling::{Sampler, SamplingRate};
use crate::pipeline::{Pipeline, RunReport};
use crate::types::RawRecord;
use crate::vocabulary::Vocabulary;

/// Where the raw export comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    File { path: PathBuf, format: InputFormat },
    Url { url: String, timeout: Duration },
}

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub source: InputSource,
    pub output: PathBuf,
    /// Sampling rate and seed; `None` keeps every record
    pub sampling: Option<(SamplingRate, u64)>,
}

/// Use case for converting one export into a committed (or rejected)
/// Darwin Core file
pub struct ConvertUseCase {
    settings: Settings,
    vocab: Vocabulary,
}

impl ConvertUseCase {
    pub fn new(settings: Settings) -> Self {
        let vocab = Vocabulary::from_config(&settings.vocabulary);
        Self { settings, vocab }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load the input, then stage, convert, and commit. Input failures
    /// surface before the staging file is created.
    pub async fn execute(&self, request: ConvertRequest) -> Result<RunReport> {
        let records = load_records(&request.source).await?;

        let sampler = request
            .sampling
            .map(|(rate, seed)| Sampler::new(rate, seed));

        let sink = StagedCsvSink::create(&request.output)?;
        info!("Converting {} records into {}", records.len(), request.output.display());

        Pipeline::new(&self.settings, &self.vocab).run(records, sink, sampler)
    }
}

pub async fn load_records(source: &InputSource) -> Result<Vec<RawRecord>> {
    match source {
        InputSource::File { path, format } => parser::read_records(path, *format),
        InputSource::Url { url, timeout } => {
            VectorBaseClient::new(*timeout)?.fetch_records(url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_unreadable_input_never_creates_staging_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("scan.csv");
        let use_case = ConvertUseCase::new(Settings::default());

        let result = use_case
            .execute(ConvertRequest {
                source: InputSource::File {
                    path: dir.path().join("missing.csv"),
                    format: InputFormat::Csv,
                },
                output: output.clone(),
                sampling: None,
            })
            .await;

        assert!(result.is_err());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_converts_csv_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("export.csv");
        let output = dir.path().join("scan.csv");
        fs::write(
            &input,
            "accession,species,geo_coords,tags\nVBA1,Aedes aegypti,\"1.5,2.5\",abundance;ICEMR\n",
        )
        .unwrap();

        let report = ConvertUseCase::new(Settings::default())
            .execute(ConvertRequest {
                source: InputSource::File { path: input, format: InputFormat::Csv },
                output: output.clone(),
                sampling: None,
            })
            .await
            .unwrap();

        assert!(report.outcome.is_committed());
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("Aedes aegypti"));
        assert!(text.contains("on behalf of ICEMR"));
    }
}
