#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

pub mod frame;

pub use frame::{GeodesyError, GeodeticFrame, EARTH_RADIUS_M};
