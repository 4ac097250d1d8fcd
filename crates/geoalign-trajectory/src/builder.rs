//! Correspondence curve accumulation.
//!
//! Walks a directory of per-event records and resolves each record to a
//! (visual-odometry position, geodetic position) pair through the
//! synchronization service. Records that fail to decode or to match are
//! skipped; only fully resolved events contribute a correspondence.

use std::path::Path;

use thiserror::Error;

use crate::curve::Curve;
use crate::record::{read_event_record, RecordError};
use crate::sync::{PositionQuery, Timestamp, TriggerQuery};

/// Error types for trajectory accumulation.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// Error enumerating the records directory.
    #[error("error reading records directory")]
    Io(#[from] std::io::Error),
}

/// The two correspondence curves built from one record directory.
///
/// Points are appended pairwise, so both curves always hold the same number
/// of points and index `i` of one corresponds to index `i` of the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryPair {
    odometry: Curve,
    geodetic: Curve,
}

impl TrajectoryPair {
    /// Create an empty pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one correspondence to both curves.
    pub fn push(&mut self, odometry: [f64; 3], geodetic: [f64; 3]) {
        self.odometry.push(odometry);
        self.geodetic.push(geodetic);
    }

    /// Number of correspondences.
    #[inline]
    pub fn len(&self) -> usize {
        self.odometry.len()
    }

    /// Check if no correspondence was accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.odometry.is_empty()
    }

    /// Get the visual-odometry curve.
    pub fn odometry(&self) -> &Curve {
        &self.odometry
    }

    /// Get the geodetic curve.
    pub fn geodetic(&self) -> &Curve {
        &self.geodetic
    }

    /// Consume the pair, returning the `(odometry, geodetic)` curves.
    pub fn into_curves(self) -> (Curve, Curve) {
        (self.odometry, self.geodetic)
    }
}

/// Build the correspondence curves for one record directory.
///
/// # Arguments
///
/// * `records_dir` - Directory of per-event record files.
/// * `delay_seconds` - Correction added to each record's whole seconds
///   before the trigger query. May be negative.
/// * `trigger` - Trigger table handle of the synchronization service.
/// * `position` - Position table handle of the synchronization service.
///
/// # Returns
///
/// The accumulated [`TrajectoryPair`]. A record contributes one
/// correspondence only when it decodes and both queries succeed; any other
/// outcome skips the record without failing the stage.
pub fn build_trajectories<T, P>(
    records_dir: impl AsRef<Path>,
    delay_seconds: i64,
    trigger: &T,
    position: &P,
) -> Result<TrajectoryPair, TrajectoryError>
where
    T: TriggerQuery,
    P: PositionQuery,
{
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(records_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        entries.push(entry.path());
    }
    // record names start with the timestamp, so name order is capture order
    entries.sort();

    let mut pair = TrajectoryPair::new();
    let mut skipped = 0usize;

    for path in &entries {
        let record = match read_event_record(path) {
            Ok(record) => record,
            Err(RecordError::Io(err)) => {
                log::warn!("cannot read {}: {}", path.display(), err);
                skipped += 1;
                continue;
            }
            Err(err) => {
                log::debug!("skipping {}: {}", path.display(), err);
                skipped += 1;
                continue;
            }
        };

        let adjusted = match record.seconds.checked_add_signed(delay_seconds) {
            Some(adjusted) => adjusted,
            None => {
                log::debug!("skipping {}: delay overflows the timestamp", path.display());
                skipped += 1;
                continue;
            }
        };
        let master = Timestamp::compose(adjusted, record.microseconds);

        let synch = match trigger.by_master(master) {
            Some(synch) => synch,
            None => {
                log::debug!("skipping {}: no trigger match for {}", path.display(), master);
                skipped += 1;
                continue;
            }
        };
        let fix = match position.at(synch) {
            Some(fix) => fix,
            None => {
                log::debug!("skipping {}: no position fix at {}", path.display(), synch);
                skipped += 1;
                continue;
            }
        };

        pair.push(record.position, fix);
    }

    log::debug!(
        "accumulated {} correspondences, skipped {} records",
        pair.len(),
        skipped
    );

    Ok(pair)
}
