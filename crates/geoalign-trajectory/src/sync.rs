//! Timestamps and query interfaces of the time-synchronization service.
//!
//! The synchronization service is an external collaborator: it knows which
//! camera-trigger event matches which master timestamp, and which geodetic
//! fix was recorded at a synchronized timestamp. This module defines the
//! query contract ([`TriggerQuery`], [`PositionQuery`]) plus a file-backed
//! adapter over the plain-text tables the service exports per device.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// Bits reserved for the sub-second part of a composed timestamp.
const SUBSECOND_BITS: u32 = 32;

/// A composed event timestamp.
///
/// Whole seconds live in the high 32 bits and the microsecond part in the
/// low 32, so composed values order chronologically and compare for
/// equality losslessly. `seconds` must stay below 2^32 and `microseconds`
/// below one million.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Compose a timestamp from whole seconds and a microsecond part.
    #[inline]
    pub fn compose(seconds: u64, microseconds: u64) -> Self {
        debug_assert!(seconds >> SUBSECOND_BITS == 0 && microseconds >> SUBSECOND_BITS == 0);
        Self((seconds << SUBSECOND_BITS) | microseconds)
    }

    /// Get the whole-second part.
    #[inline]
    pub fn seconds(&self) -> u64 {
        self.0 >> SUBSECOND_BITS
    }

    /// Get the microsecond part.
    #[inline]
    pub fn microseconds(&self) -> u64 {
        self.0 & ((1u64 << SUBSECOND_BITS) - 1)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}.{:06}", self.seconds(), self.microseconds())
    }
}

/// Camera-trigger lookup by master timestamp.
pub trait TriggerQuery {
    /// Find the synchronized timestamp matched to a master timestamp, if any.
    fn by_master(&self, master: Timestamp) -> Option<Timestamp>;
}

/// Geodetic position lookup by synchronized timestamp.
pub trait PositionQuery {
    /// Find the `[longitude, latitude, altitude]` fix recorded at a
    /// synchronized timestamp, if any.
    fn at(&self, synch: Timestamp) -> Option<[f64; 3]>;
}

/// Error types for the synchronization index.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Error reading an index file.
    #[error("error reading index file")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("parse error {0}")]
    ParseError(String),
}

/// Trigger table of one camera device, keyed by master timestamp.
///
/// Loaded from `<root>/<tag>/<module>/trigger`, one entry per line:
/// `<master sec> <master usec> <synch sec> <synch usec>`. Blank lines and
/// `#` comments are skipped.
#[derive(Debug, Default)]
pub struct TriggerIndex {
    entries: HashMap<Timestamp, Timestamp>,
}

impl TriggerIndex {
    /// Load the trigger table exported for a device.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory of the synchronization index.
    /// * `tag` - Device tag of the camera.
    /// * `module` - Device module of the camera.
    pub fn open(root: impl AsRef<Path>, tag: &str, module: &str) -> Result<Self, SyncError> {
        let path = root.as_ref().join(tag).join(module).join("trigger");
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut entries = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let parts = match data_fields(&line, 4)? {
                Some(parts) => parts,
                None => continue,
            };
            let master = Timestamp::compose(parse_part(parts[0])?, parse_part(parts[1])?);
            let synch = Timestamp::compose(parse_part(parts[2])?, parse_part(parts[3])?);
            entries.insert(master, synch);
        }

        Ok(Self { entries })
    }

    /// Number of trigger entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table holds no entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TriggerQuery for TriggerIndex {
    fn by_master(&self, master: Timestamp) -> Option<Timestamp> {
        self.entries.get(&master).copied()
    }
}

/// Position table of one GPS device, keyed by synchronized timestamp.
///
/// Loaded from `<root>/<tag>/<module>/position`, one entry per line:
/// `<sec> <usec> <longitude> <latitude> <altitude>`. Blank lines and `#`
/// comments are skipped.
#[derive(Debug, Default)]
pub struct PositionIndex {
    entries: HashMap<Timestamp, [f64; 3]>,
}

impl PositionIndex {
    /// Load the position table exported for a device.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory of the synchronization index.
    /// * `tag` - Device tag of the GPS receiver.
    /// * `module` - Device module of the GPS receiver.
    pub fn open(root: impl AsRef<Path>, tag: &str, module: &str) -> Result<Self, SyncError> {
        let path = root.as_ref().join(tag).join(module).join("position");
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut entries = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let parts = match data_fields(&line, 5)? {
                Some(parts) => parts,
                None => continue,
            };
            let synch = Timestamp::compose(parse_part(parts[0])?, parse_part(parts[1])?);
            let fix = [
                parse_part(parts[2])?,
                parse_part(parts[3])?,
                parse_part(parts[4])?,
            ];
            entries.insert(synch, fix);
        }

        Ok(Self { entries })
    }

    /// Number of position entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table holds no entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PositionQuery for PositionIndex {
    fn at(&self, synch: Timestamp) -> Option<[f64; 3]> {
        self.entries.get(&synch).copied()
    }
}

/// Split a data line into exactly `expected` fields, skipping blank lines
/// and `#` comments.
fn data_fields(line: &str, expected: usize) -> Result<Option<Vec<&str>>, SyncError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parts = trimmed.split_whitespace().collect::<Vec<_>>();
    if parts.len() != expected {
        return Err(SyncError::ParseError(format!(
            "expected {} fields, found {}",
            expected,
            parts.len()
        )));
    }
    Ok(Some(parts))
}

fn parse_part<T: std::str::FromStr>(s: &str) -> Result<T, SyncError>
where
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| SyncError::ParseError(format!("{}: {}", s, e)))
}
