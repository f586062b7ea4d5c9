use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use crate::observability::metrics;

/// Kinds of record-level anomaly that block a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemCategory {
    /// First species term is not an accepted genus
    UnknownGenus,
    /// Third species term is neither a subspecies nor a group qualifier
    UnknownThirdTerm,
    /// Remaining tags are not exactly one known provider
    UnexpectedTag,
    /// Coordinates are not a "lat,lon" pair
    MalformedCoordinates,
    /// Species designation has no terms
    EmptySpecies,
}

impl ProblemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemCategory::UnknownGenus => "unknown genus term",
            ProblemCategory::UnknownThirdTerm => "unknown third term",
            ProblemCategory::UnexpectedTag => "unexpected tag",
            ProblemCategory::MalformedCoordinates => "malformed coordinates",
            ProblemCategory::EmptySpecies => "empty species designation",
        }
    }
}

impl fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single distinct anomaly, with the record where it was first seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub category: ProblemCategory,
    pub value: String,
    pub record_id: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\" at {}", self.category, self.value, self.record_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Clean,
    Dirty,
}

/// Collects anomalies for a whole run, keeping the first occurrence of each
/// (category, value) pair. Once dirty it never becomes clean again.
#[derive(Debug, Default)]
pub struct ProblemCollector {
    seen: HashSet<(ProblemCategory, String)>,
    problems: Vec<Problem>,
}

impl ProblemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly. Returns false when the same value was already
    /// reported under this category.
    pub fn record(&mut self, category: ProblemCategory, value: impl Into<String>, record_id: &str) -> bool {
        let value = value.into();
        if !self.seen.insert((category, value.clone())) {
            return false;
        }

        warn!(category = %category, value = %value, record_id, "New data problem");
        metrics::quality_gate::problem_recorded(category.as_str());

        self.problems.push(Problem {
            category,
            value,
            record_id: record_id.to_string(),
        });
        true
    }

    pub fn state(&self) -> GateState {
        if self.problems.is_empty() {
            GateState::Clean
        } else {
            GateState::Dirty
        }
    }

    pub fn is_clean(&self) -> bool {
        self.state() == GateState::Clean
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Problems in first-observed order
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}
