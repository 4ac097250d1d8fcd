//! Per-event visual-odometry record decoding.
//!
//! A record file is named `<seconds>_<subcounter>` (an extension, if present,
//! is ignored) and holds exactly twelve whitespace-separated floating-point
//! fields. Only the trailing three are consumed here: the event's
//! visual-odometry longitude, latitude and altitude.

use std::path::Path;

use thiserror::Error;

/// Number of whitespace-separated fields a record must hold.
const RECORD_FIELDS: usize = 12;

/// Error types for record decoding.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Error reading the record file.
    #[error("error reading record file")]
    Io(#[from] std::io::Error),

    /// The file name does not encode `<seconds>_<subcounter>`.
    #[error("invalid record file name: {0}")]
    InvalidFileName(String),

    /// The record does not hold exactly twelve fields.
    #[error("expected {RECORD_FIELDS} fields, found {0}")]
    FieldCount(usize),

    /// A field does not parse as a floating-point number.
    #[error("parse error {0}")]
    ParseError(String),
}

/// A decoded per-event record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    /// Event timestamp, whole seconds.
    pub seconds: u64,
    /// Event timestamp, microsecond part.
    pub microseconds: u64,
    /// Visual-odometry position, `[longitude, latitude, altitude]`.
    pub position: [f64; 3],
}

/// Decode a per-event record file.
///
/// # Arguments
///
/// * `path` - The record file, named `<seconds>_<subcounter>`.
///
/// # Returns
///
/// The [`EventRecord`] with the timestamp taken from the file name and the
/// position taken from the last three of the twelve record fields.
pub fn read_event_record(path: impl AsRef<Path>) -> Result<EventRecord, RecordError> {
    let path = path.as_ref();
    let (seconds, microseconds) = parse_record_name(path)?;

    let content = std::fs::read_to_string(path)?;
    let fields = content.split_whitespace().collect::<Vec<_>>();
    if fields.len() != RECORD_FIELDS {
        return Err(RecordError::FieldCount(fields.len()));
    }

    let values = fields
        .iter()
        .map(|s| parse_field(s))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(EventRecord {
        seconds,
        microseconds,
        position: [values[9], values[10], values[11]],
    })
}

fn parse_record_name(path: &Path) -> Result<(u64, u64), RecordError> {
    let invalid = || RecordError::InvalidFileName(path.display().to_string());

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(invalid)?;
    let (seconds, microseconds) = stem.split_once('_').ok_or_else(invalid)?;

    Ok((
        seconds.parse::<u64>().map_err(|_| invalid())?,
        microseconds.parse::<u64>().map_err(|_| invalid())?,
    ))
}

fn parse_field(s: &str) -> Result<f64, RecordError> {
    s.parse::<f64>()
        .map_err(|e| RecordError::ParseError(format!("{}: {}", s, e)))
}
