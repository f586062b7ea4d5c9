use crate::config::VocabularyConfig;
use std::collections::{HashMap, HashSet};

/// Immutable closed set of accepted tokens.
#[derive(Debug, Clone, Default)]
pub struct TermSet(HashSet<String>);

impl TermSet {
    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// All vocabulary tables for a run. Built once at startup and shared
/// read-only by every extractor.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub genera: TermSet,
    pub subspecies: TermSet,
    pub group_qualifiers: TermSet,
    pub rank_markers: TermSet,
    pub provider_tags: TermSet,
    pub discard_tags: TermSet,
    pub skip_provider_tags: TermSet,
    pub skip_protocols: TermSet,
    pub skip_projects: TermSet,
    species_rewrites: HashMap<String, String>,
}

impl Vocabulary {
    pub fn from_config(config: &VocabularyConfig) -> Self {
        Self {
            genera: config.genera.iter().collect(),
            subspecies: config.subspecies.iter().collect(),
            group_qualifiers: config.group_qualifiers.iter().collect(),
            rank_markers: config.rank_markers.iter().collect(),
            provider_tags: config.provider_tags.iter().collect(),
            discard_tags: config.discard_tags.iter().collect(),
            skip_provider_tags: config.skip_provider_tags.iter().collect(),
            skip_protocols: config.skip_protocols.iter().collect(),
            skip_projects: config.skip_projects.iter().collect(),
            species_rewrites: config
                .species_rewrites
                .iter()
                .map(|(from, to)| (from.clone(), to.clone()))
                .collect(),
        }
    }

    /// Canonical replacement for a known malformed designation.
    pub fn rewrite_species<'a>(&'a self, designation: &'a str) -> &'a str {
        self.species_rewrites
            .get(designation)
            .map(String::as_str)
            .unwrap_or(designation)
    }
}
