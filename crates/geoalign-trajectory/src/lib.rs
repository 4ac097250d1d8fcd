#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

pub mod builder;
pub mod curve;
pub mod record;
pub mod sync;

pub use builder::{build_trajectories, TrajectoryError, TrajectoryPair};
pub use curve::Curve;
pub use record::{read_event_record, EventRecord, RecordError};
pub use sync::{PositionIndex, PositionQuery, SyncError, Timestamp, TriggerIndex, TriggerQuery};
