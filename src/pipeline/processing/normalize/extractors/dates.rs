use chrono::NaiveDate;
use tracing::warn;

use crate::observability::metrics;

/// Date prefix of a collection timestamp ("2015-06-01T00:00:00Z" ->
/// "2015-06-01"). Values that are not ISO dates pass through truncated and
/// are only logged; `verbatimEventDate` keeps the full original.
pub fn event_date(raw: &str, record_id: &str) -> String {
    let raw = raw.trim();
    let prefix: String = raw.chars().take(10).collect();

    if !prefix.is_empty() && NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").is_err() {
        warn!(record_id, value = raw, "Collection date is not an ISO date");
        metrics::normalize::non_iso_date();
    }

    prefix
}
