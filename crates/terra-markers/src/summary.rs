//! Headline numbers for the current event list.

use crate::event::EventRecord;

/// Aggregate figures across all active events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventSummary {
    pub active_events: usize,
    pub people_affected: u64,
}

impl EventSummary {
    /// Summarize `records`.
    pub fn from_records(records: &[EventRecord]) -> Self {
        Self {
            active_events: records.len(),
            people_affected: records
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.people_affected)),
        }
    }

    /// Compact form, e.g. `Events: 5 | Affected: 10.6K`.
    pub fn format(&self) -> String {
        format!(
            "Events: {} | Affected: {}",
            self.active_events,
            format_count(self.people_affected)
        )
    }
}

/// Abbreviate a count with K/M/B suffixes and one decimal, dropping a
/// trailing `.0`.
pub fn format_count(n: u64) -> String {
    const SUFFIXES: [(u64, &str); 3] = [
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];
    for (scale, suffix) in SUFFIXES {
        if n >= scale {
            let value = format!("{:.1}", n as f64 / scale as f64);
            let value = value.strip_suffix(".0").unwrap_or(&value);
            return format!("{value}{suffix}");
        }
    }
    n.to_string()
}
