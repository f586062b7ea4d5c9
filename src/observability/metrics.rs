//! Metrics for the conversion pipeline
//!
//! Phase modules record through the `metrics` facade. Without an installed
//! recorder (library use, tests) every call is a no-op; the CLI installs a
//! Prometheus recorder and can write a text snapshot at the end of a run.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;

/// Enum representing all metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingest metrics
    IngestRecordsRead,
    IngestFetchDuration,

    // Filter metrics
    FilterRecordsSkipped,

    // Sampling metrics
    SamplingRecordsDropped,

    // Normalize metrics
    NormalizeRecordsWritten,
    NormalizeNonIsoDates,

    // Quality gate metrics
    QualityGateProblemsRecorded,

    // Run metrics
    RunCommitted,
    RunRejected,
    RunDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRecordsRead => "scan_dwc_ingest_records_read_total",
            MetricName::IngestFetchDuration => "scan_dwc_ingest_fetch_duration_seconds",
            MetricName::FilterRecordsSkipped => "scan_dwc_filter_records_skipped_total",
            MetricName::SamplingRecordsDropped => "scan_dwc_sampling_records_dropped_total",
            MetricName::NormalizeRecordsWritten => "scan_dwc_normalize_records_written_total",
            MetricName::NormalizeNonIsoDates => "scan_dwc_normalize_non_iso_dates_total",
            MetricName::QualityGateProblemsRecorded => "scan_dwc_quality_gate_problems_recorded_total",
            MetricName::RunCommitted => "scan_dwc_run_committed_total",
            MetricName::RunRejected => "scan_dwc_run_rejected_total",
            MetricName::RunDuration => "scan_dwc_run_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder for this process
pub fn init() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    tracing::debug!("Metrics recorder installed");
    Ok(handle)
}

pub mod ingest {
    use super::MetricName;

    pub fn records_read(count: usize) {
        ::metrics::counter!(MetricName::IngestRecordsRead.as_str()).increment(count as u64);
    }

    pub fn fetch_duration(secs: f64) {
        ::metrics::histogram!(MetricName::IngestFetchDuration.as_str()).record(secs);
    }
}

pub mod filter {
    use super::MetricName;

    pub fn record_skipped(reason: &'static str) {
        ::metrics::counter!(MetricName::FilterRecordsSkipped.as_str(), "reason" => reason).increment(1);
    }
}

pub mod sampling {
    use super::MetricName;

    pub fn record_dropped() {
        ::metrics::counter!(MetricName::SamplingRecordsDropped.as_str()).increment(1);
    }
}

pub mod normalize {
    use super::MetricName;

    pub fn record_written() {
        ::metrics::counter!(MetricName::NormalizeRecordsWritten.as_str()).increment(1);
    }

    pub fn non_iso_date() {
        ::metrics::counter!(MetricName::NormalizeNonIsoDates.as_str()).increment(1);
    }
}

pub mod quality_gate {
    use super::MetricName;

    pub fn problem_recorded(category: &'static str) {
        ::metrics::counter!(MetricName::QualityGateProblemsRecorded.as_str(), "category" => category)
            .increment(1);
    }
}

pub mod run {
    use super::MetricName;

    pub fn committed(duration_secs: f64) {
        ::metrics::counter!(MetricName::RunCommitted.as_str()).increment(1);
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(duration_secs);
    }

    pub fn rejected(duration_secs: f64) {
        ::metrics::counter!(MetricName::RunRejected.as_str()).increment(1);
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(duration_secs);
    }
}
