use std::fmt;

use crate::config::FieldMapping;
use crate::pipeline::processing::normalize::extractors::tags;
use crate::types::SourceRecord;
use crate::vocabulary::Vocabulary;

/// Why a record was left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingGeodata,
    SkippedProtocol(String),
    SkippedProject(String),
    SkippedProvider(String),
}

impl SkipReason {
    /// Stable label for counters and summaries
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MissingGeodata => "missing_geodata",
            SkipReason::SkippedProtocol(_) => "skipped_protocol",
            SkipReason::SkippedProject(_) => "skipped_project",
            SkipReason::SkippedProvider(_) => "skipped_provider",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingGeodata => write!(f, "no geolocation data"),
            SkipReason::SkippedProtocol(p) => write!(f, "collection protocol '{}' is excluded", p),
            SkipReason::SkippedProject(p) => write!(f, "project '{}' is excluded", p),
            SkipReason::SkippedProvider(p) => write!(f, "provider '{}' is excluded", p),
        }
    }
}

/// Exclusion predicate evaluated before any extractor runs, so discarded
/// records never add problems.
pub struct RecordFilter<'a> {
    fields: &'a FieldMapping,
    vocab: &'a Vocabulary,
}

impl<'a> RecordFilter<'a> {
    pub fn new(fields: &'a FieldMapping, vocab: &'a Vocabulary) -> Self {
        Self { fields, vocab }
    }

    /// `Some(reason)` when the record must be excluded
    pub fn should_skip(&self, record: &SourceRecord) -> Option<SkipReason> {
        let has_geodata = record
            .values(&self.fields.coordinates)
            .iter()
            .any(|v| !v.trim().is_empty());
        if !has_geodata {
            return Some(SkipReason::MissingGeodata);
        }

        if let Some(protocol) = record
            .values(&self.fields.collection_protocols)
            .iter()
            .find(|p| self.vocab.skip_protocols.contains(p))
        {
            return Some(SkipReason::SkippedProtocol(protocol.clone()));
        }

        if let Some(project) = record
            .values(&self.fields.projects)
            .iter()
            .find(|p| self.vocab.skip_projects.contains(p))
        {
            return Some(SkipReason::SkippedProject(project.clone()));
        }

        let resolution = tags::resolve(record.values(&self.fields.tags), self.vocab);
        if resolution.is_skipped(self.vocab) {
            return resolution.provider.map(SkipReason::SkippedProvider);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, VocabularyConfig};
    use crate::types::RawRecord;

    fn check(raw: RawRecord, vocab_config: VocabularyConfig) -> Option<SkipReason> {
        let settings = Settings::default();
        let vocab = Vocabulary::from_config(&vocab_config);
        let filter = RecordFilter::new(&settings.fields, &vocab);
        filter.should_skip(&raw.with_defaults(settings.fields.template()))
    }

    fn located() -> RawRecord {
        RawRecord::new()
            .with("accession", &["VBA1"])
            .with("geo_coords", &["1.5,2.5"])
    }

    #[test]
    fn test_keeps_located_record() {
        assert_eq!(check(located(), VocabularyConfig::default()), None);
    }

    #[test]
    fn test_missing_geodata() {
        let raw = RawRecord::new().with("accession", &["VBA1"]);
        assert_eq!(check(raw, VocabularyConfig::default()), Some(SkipReason::MissingGeodata));

        let blank = RawRecord::new().with("geo_coords", &["  "]);
        assert_eq!(check(blank, VocabularyConfig::default()), Some(SkipReason::MissingGeodata));
    }

    #[test]
    fn test_any_skipped_protocol_excludes() {
        let raw = located().with("collection_protocols", &["CDC light trap", "BG-Counter trap catch"]);
        assert_eq!(
            check(raw, VocabularyConfig::default()),
            Some(SkipReason::SkippedProtocol("BG-Counter trap catch".to_string()))
        );
    }

    #[test]
    fn test_skipped_project() {
        let config = VocabularyConfig {
            skip_projects: vec!["VBP0000999".to_string()],
            ..VocabularyConfig::default()
        };
        let raw = located().with("projects", &["VBP0000001", "VBP0000999"]);
        let reason = check(raw, config).unwrap();
        assert_eq!(reason.label(), "skipped_project");
        assert_eq!(reason.to_string(), "project 'VBP0000999' is excluded");
    }

    #[test]
    fn test_skipped_provider_after_discarding_tags() {
        let raw = located().with("tags", &["abundance", "NEON"]);
        assert_eq!(
            check(raw, VocabularyConfig::default()),
            Some(SkipReason::SkippedProvider("NEON".to_string()))
        );
    }

    #[test]
    fn test_unknown_tags_are_not_filtered() {
        // Left for the tag extractor to flag
        let raw = located().with("tags", &["Somebody"]);
        assert_eq!(check(raw, VocabularyConfig::default()), None);
    }
}
