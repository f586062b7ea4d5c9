use crate::pipeline::processing::quality_gate::{ProblemCategory, ProblemCollector};
use crate::types::MULTI_VALUE_SEPARATOR;
use crate::vocabulary::Vocabulary;

/// Outcome of reducing a record's tag list to provenance information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagResolution {
    /// Distinct tags left after removing discard-listed ones, in input order
    pub effective: Vec<String>,
    /// The attributing provider: the first effective tag, if any
    pub provider: Option<String>,
    /// Joined effective tags when they are not exactly one known provider
    pub unexpected: Option<String>,
}

impl TagResolution {
    /// Whether the attributing provider publishes through another channel.
    pub fn is_skipped(&self, vocab: &Vocabulary) -> bool {
        self.provider
            .as_deref()
            .is_some_and(|p| vocab.skip_provider_tags.contains(p))
    }
}

/// Pure tag reduction; does not touch the problem collector so the record
/// filter can use it before a record is accepted.
pub fn resolve(tags: &[String], vocab: &Vocabulary) -> TagResolution {
    let mut effective: Vec<String> = Vec::new();
    for tag in tags {
        if !vocab.discard_tags.contains(tag) && !effective.contains(tag) {
            effective.push(tag.clone());
        }
    }

    let provider = effective.first().cloned();

    let unexpected = match effective.as_slice() {
        [] => None,
        [only] if vocab.provider_tags.contains(only) => None,
        _ => Some(effective.join(MULTI_VALUE_SEPARATOR)),
    };

    TagResolution {
        effective,
        provider,
        unexpected,
    }
}

/// Resolve tags and route any unexpected combination to the collector.
pub fn extract(
    tags: &[String],
    vocab: &Vocabulary,
    record_id: &str,
    problems: &mut ProblemCollector,
) -> TagResolution {
    let resolution = resolve(tags, vocab);
    if let Some(joined) = &resolution.unexpected {
        problems.record(ProblemCategory::UnexpectedTag, joined.as_str(), record_id);
    }
    resolution
}
