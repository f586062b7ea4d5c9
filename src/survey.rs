//! Vocabulary survey: list the distinct values a field takes across an
//! export, to decide what belongs in the vocabulary tables.

use std::collections::HashSet;

use crate::types::{RawRecord, MULTI_VALUE_SEPARATOR};

/// Distinct values of `field` in first-seen order. With `split`, each value
/// of a multi-valued field counts separately; otherwise the record's values
/// are joined and counted as one term.
pub fn unique_terms(records: &[RawRecord], field: &str, split: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    let mut push = |term: String| {
        if seen.insert(term.clone()) {
            terms.push(term);
        }
    };

    for record in records {
        let Some(values) = record.fields.get(field) else {
            continue;
        };
        if split {
            values.iter().cloned().for_each(&mut push);
        } else {
            push(values.join(MULTI_VALUE_SEPARATOR));
        }
    }

    terms
}
