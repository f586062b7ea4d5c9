// Conversion pipeline: default filling, filtering, sampling, extraction, commit

pub mod processing;
pub mod sampling;

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::app::ports::{CommitReceipt, RecordSink};
use crate::config::Settings;
use crate::error::Result;
use crate::observability::metrics;
use crate::types::RawRecord;
use crate::vocabulary::Vocabulary;

use processing::{Problem, ProblemCollector, RecordFilter, RecordNormalizer};
use sampling::Sampler;

/// Per-run record counts
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub read: usize,
    /// Filtered records by reason label
    pub skipped: BTreeMap<&'static str, usize>,
    pub sampled_out: usize,
    pub written: usize,
}

impl RunStats {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// All-or-nothing result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No problems; staged output promoted to the final location
    Committed(CommitReceipt),
    /// Problems found; staged output discarded, final location untouched
    Rejected(Vec<Problem>),
}

impl RunOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, RunOutcome::Committed(_))
    }

    pub fn problems(&self) -> &[Problem] {
        match self {
            RunOutcome::Committed(_) => &[],
            RunOutcome::Rejected(problems) => problems,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,
    pub outcome: RunOutcome,
}

/// Single-pass driver over a batch of raw records
pub struct Pipeline<'a> {
    settings: &'a Settings,
    vocab: &'a Vocabulary,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings, vocab: &'a Vocabulary) -> Self {
        Self { settings, vocab }
    }

    /// Convert `records` into `sink`, committing only when no problem was
    /// recorded. Records are processed and written in input order.
    #[instrument(skip_all, fields(sampling = sampler.as_ref().map(|s| s.rate().percent())))]
    pub fn run<I, S>(&self, records: I, mut sink: S, sampler: Option<Sampler>) -> Result<RunReport>
    where
        I: IntoIterator<Item = RawRecord>,
        S: RecordSink,
    {
        let started = Instant::now();
        let mut problems = ProblemCollector::new();
        let mut stats = RunStats::default();

        if let Err(e) = self.stream(records, &mut sink, sampler, &mut problems, &mut stats) {
            if let Err(discard_err) = sink.discard() {
                warn!("Failed to discard staged output: {}", discard_err);
            }
            return Err(e);
        }

        info!(
            read = stats.read,
            skipped = stats.skipped_total(),
            sampled_out = stats.sampled_out,
            written = stats.written,
            "Processed batch"
        );

        let elapsed = started.elapsed().as_secs_f64();
        let outcome = if problems.is_clean() {
            let receipt = sink.commit()?;
            metrics::run::committed(elapsed);
            info!("✅ Committed {} rows to {}", receipt.rows, receipt.location);
            RunOutcome::Committed(receipt)
        } else {
            sink.discard()?;
            metrics::run::rejected(elapsed);
            warn!("❌ Rejected batch with {} distinct problems", problems.len());
            RunOutcome::Rejected(problems.into_problems())
        };

        Ok(RunReport { stats, outcome })
    }

    fn stream<I, S>(
        &self,
        records: I,
        sink: &mut S,
        mut sampler: Option<Sampler>,
        problems: &mut ProblemCollector,
        stats: &mut RunStats,
    ) -> Result<()>
    where
        I: IntoIterator<Item = RawRecord>,
        S: RecordSink,
    {
        let normalizer = RecordNormalizer::new(self.settings, self.vocab)?;
        let filter = RecordFilter::new(&self.settings.fields, self.vocab);
        let template = self.settings.fields.template();
        let columns = &self.settings.output.columns;

        sink.write_header(columns)?;

        for raw in records {
            stats.read += 1;
            let record = raw.with_defaults(template.iter().copied());

            if let Some(reason) = filter.should_skip(&record) {
                debug!(record_id = record.first(&self.settings.fields.id), %reason, "Skipping record");
                metrics::filter::record_skipped(reason.label());
                *stats.skipped.entry(reason.label()).or_default() += 1;
                continue;
            }

            if let Some(sampler) = sampler.as_mut() {
                if !sampler.keep() {
                    metrics::sampling::record_dropped();
                    stats.sampled_out += 1;
                    continue;
                }
            }

            let row = normalizer.normalize(&record, problems);
            sink.write_row(&row.to_row(columns))?;
            metrics::normalize::record_written();
            stats.written += 1;
        }

        metrics::ingest::records_read(stats.read);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory_output_adapter::InMemorySink;
    use crate::pipeline::processing::ProblemCategory;
    use crate::pipeline::sampling::SamplingRate;

    fn located(id: &str, species: &str) -> RawRecord {
        RawRecord::new()
            .with("accession", &[id])
            .with("species", &[species])
            .with("geo_coords", &["10.5,20.25"])
    }

    fn run(records: Vec<RawRecord>, sampler: Option<Sampler>) -> (RunReport, Option<String>) {
        let settings = Settings::default();
        let vocab = Vocabulary::from_config(&settings.vocabulary);
        let sink = InMemorySink::new();
        let output = sink.output();

        let report = Pipeline::new(&settings, &vocab).run(records, sink, sampler).unwrap();
        let text = output.lock().unwrap().committed_text();
        (report, text)
    }

    #[test]
    fn test_clean_batch_commits_in_input_order() {
        let (report, text) = run(
            vec![
                located("VBA2", "Culex pipiens"),
                located("VBA1", "Aedes aegypti"),
            ],
            None,
        );

        assert!(report.outcome.is_committed());
        assert_eq!(report.stats.written, 2);

        let text = text.unwrap();
        let ids: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["VBA2", "VBA1"]);
    }

    #[test]
    fn test_filtered_records_do_not_raise_problems() {
        let no_coords = RawRecord::new()
            .with("accession", &["VBA3"])
            .with("species", &["Notagenus nonsense"]);
        let (report, _) = run(vec![located("VBA1", "Aedes aegypti"), no_coords], None);

        assert!(report.outcome.is_committed());
        assert_eq!(report.stats.skipped.get("missing_geodata"), Some(&1));
        assert_eq!(report.stats.written, 1);
    }

    #[test]
    fn test_problems_reject_the_whole_batch() {
        let (report, text) = run(
            vec![
                located("VBA1", "Aedes aegypti"),
                located("VBA2", "Aedez aegypti"),
                located("VBA3", "Aedez albopictus"),
            ],
            None,
        );

        assert!(text.is_none());
        let problems = report.outcome.problems();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].category, ProblemCategory::UnknownGenus);
        assert_eq!(problems[0].record_id, "VBA2");
    }

    #[test]
    fn test_zero_sampling_commits_header_only() {
        let sampler = Sampler::new(SamplingRate::new(0).unwrap(), 1);
        let (report, text) = run(vec![located("VBA1", "Aedes aegypti")], Some(sampler));

        assert!(report.outcome.is_committed());
        assert_eq!(report.stats.sampled_out, 1);
        let text = text.unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("occurrenceID,catalogNumber,"));
    }

    #[test]
    fn test_sampling_only_consumes_filter_passing_records() {
        let sampler = Sampler::new(SamplingRate::new(100).unwrap(), 1);
        let no_coords = RawRecord::new().with("accession", &["VBA9"]);
        let (report, _) = run(
            vec![located("VBA1", "Aedes aegypti"), no_coords, located("VBA2", "Culex pipiens")],
            Some(sampler),
        );

        assert_eq!(report.stats.read, 3);
        assert_eq!(report.stats.skipped_total(), 1);
        assert_eq!(report.stats.sampled_out, 0);
        assert_eq!(report.stats.written, 2);
    }
}
