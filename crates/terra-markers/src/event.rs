//! Event records supplied by the external data source.
//!
//! Records arrive as JSON objects. Parsing is lenient about every other field
//! (missing or wrongly typed values fall back to a logged default) and strict
//! about coordinates: a record without a usable position is rejected rather
//! than drawn at 0,0.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Lowest severity a record can carry.
pub const MIN_SEVERITY: u8 = 1;
/// Highest severity a record can carry.
pub const MAX_SEVERITY: u8 = 5;

/// Errors from loading event records.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The events file could not be read.
    #[error("failed to read events file: {0}")]
    Io(#[from] std::io::Error),
    /// The payload was not a JSON array of objects.
    #[error("failed to parse events: {0}")]
    Parse(#[from] serde_json::Error),
    /// A record was unusable and has been skipped.
    #[error("event {index} rejected: {reason}")]
    InvalidRecord {
        /// Position of the record in the input array.
        index: usize,
        /// Why it was rejected.
        reason: String,
    },
}

/// Disaster category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Wildfire,
    Flood,
    Hurricane,
    Earthquake,
    Other,
}

impl EventKind {
    /// Parse a category name. Unknown names map to [`EventKind::Other`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "wildfire" => Self::Wildfire,
            "flood" => Self::Flood,
            "hurricane" => Self::Hurricane,
            "earthquake" => Self::Earthquake,
            _ => Self::Other,
        }
    }

    /// Lowercase category name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wildfire => "wildfire",
            Self::Flood => "flood",
            Self::Hurricane => "hurricane",
            Self::Earthquake => "earthquake",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, geolocated event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Place name, possibly empty.
    pub name: String,
    pub kind: EventKind,
    /// Always within `MIN_SEVERITY..=MAX_SEVERITY`.
    pub severity: u8,
    pub contacts: Vec<String>,
    /// Source timestamp, kept verbatim.
    pub timestamp: String,
    pub people_affected: u64,
}

/// Wire shape of a record before validation. Every field is kept as raw
/// JSON so one badly typed value cannot fail the whole list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEventRecord {
    id: Option<Value>,
    lat: Option<Value>,
    lon: Option<Value>,
    name: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<Value>,
    severity: Option<Value>,
    contacts: Option<Value>,
    timestamp: Option<Value>,
    #[serde(rename = "peopleAffected")]
    people_affected: Option<Value>,
    people: Option<Value>,
}

impl RawEventRecord {
    fn validate(self, index: usize) -> Result<EventRecord, EventError> {
        let reject = |reason: &str| EventError::InvalidRecord {
            index,
            reason: reason.to_string(),
        };

        let lat = coordinate(self.lat).map_err(|missing| reject(&format!("{missing} lat")))?;
        let lon = coordinate(self.lon).map_err(|missing| reject(&format!("{missing} lon")))?;
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 {
            return Err(reject("coordinates out of range"));
        }

        let id = match self.id {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                debug!(index, "event has no id, using its position");
                format!("#{index}")
            }
        };

        let kind = match self.kind {
            Some(Value::String(name)) => {
                let kind = EventKind::from_name(&name);
                if kind == EventKind::Other && !name.eq_ignore_ascii_case("other") {
                    debug!(%id, kind = %name, "unknown event type, using other");
                }
                kind
            }
            None | Some(Value::Null) => {
                debug!(%id, "event has no type, using other");
                EventKind::Other
            }
            Some(other) => {
                warn!(%id, kind = %other, "event type is not a string, using other");
                EventKind::Other
            }
        };

        let severity = match self.severity {
            None | Some(Value::Null) => {
                debug!(%id, "event has no severity, using 1");
                MIN_SEVERITY
            }
            Some(raw) => match number(&raw) {
                Some(value) if value.is_finite() => clamp_severity(&id, value),
                _ => {
                    warn!(%id, severity = %raw, "severity is not a number, using 1");
                    MIN_SEVERITY
                }
            },
        };

        let name = match self.name {
            Some(Value::String(name)) => name,
            None | Some(Value::Null) => {
                debug!(%id, "event has no name");
                String::new()
            }
            Some(other) => {
                warn!(%id, name = %other, "event name is not a string, leaving it empty");
                String::new()
            }
        };

        let contacts = parse_contacts(&id, self.contacts);

        if self.people.is_some() {
            warn!(
                %id,
                field = "people",
                "legacy people count ignored, expected peopleAffected"
            );
        }
        let people_affected = match self.people_affected {
            None | Some(Value::Null) => {
                debug!(%id, "event has no peopleAffected, using 0");
                0
            }
            Some(raw) => match number(&raw) {
                Some(value) if value.is_finite() && value >= 0.0 => value.round() as u64,
                _ => {
                    warn!(%id, people_affected = %raw, "peopleAffected is not a count, using 0");
                    0
                }
            },
        };

        let timestamp = match self.timestamp {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Ok(EventRecord {
            id,
            lat,
            lon,
            name,
            kind,
            severity,
            contacts,
            timestamp,
            people_affected,
        })
    }
}

/// Coordinates must be JSON numbers. The error names what is wrong.
fn coordinate(value: Option<Value>) -> Result<f64, &'static str> {
    match value {
        None | Some(Value::Null) => Err("missing"),
        Some(Value::Number(n)) => n.as_f64().ok_or("non-numeric"),
        Some(_) => Err("non-numeric"),
    }
}

/// A JSON number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_contacts(id: &str, value: Option<Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => {
            debug!(%id, "event has no contacts");
            Vec::new()
        }
        Some(Value::String(contact)) => {
            debug!(%id, "single contact given as a string");
            vec![contact]
        }
        Some(Value::Array(items)) => {
            let total = items.len();
            let contacts: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if contacts.len() != total {
                warn!(%id, skipped = total - contacts.len(), "non-text contacts skipped");
            }
            contacts
        }
        Some(other) => {
            warn!(%id, contacts = %other, "contacts are not a list, using none");
            Vec::new()
        }
    }
}

fn clamp_severity(id: &str, raw: f64) -> u8 {
    let rounded = raw.round();
    let clamped = rounded.clamp(f64::from(MIN_SEVERITY), f64::from(MAX_SEVERITY));
    if clamped != rounded {
        warn!(%id, severity = raw, "severity out of range, clamped to {clamped}");
    }
    clamped as u8
}

/// Parse a JSON array of event records.
///
/// Only a payload that is not a JSON array is an error. Fields with the
/// wrong type fall back to their defaults, and individual records that
/// cannot be placed on the globe are skipped with a warning.
pub fn parse_events(json: &str) -> Result<Vec<EventRecord>, EventError> {
    let raw: Vec<Value> = serde_json::from_str(json)?;
    let total = raw.len();
    let records: Vec<EventRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let parsed = serde_json::from_value::<RawEventRecord>(value)
                .map_err(|e| EventError::InvalidRecord {
                    index,
                    reason: format!("not an object: {e}"),
                })
                .and_then(|record| record.validate(index));
            match parsed {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            }
        })
        .collect();
    debug!(accepted = records.len(), total, "parsed events");
    Ok(records)
}

/// Read and parse an events file.
pub fn load_events_file(path: &Path) -> Result<Vec<EventRecord>, EventError> {
    let contents = std::fs::read_to_string(path)?;
    parse_events(&contents)
}
