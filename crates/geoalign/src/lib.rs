#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use geoalign_geodesy as geodesy;

#[doc(inline)]
pub use geoalign_linalg as linalg;

#[doc(inline)]
pub use geoalign_ply as ply;

#[doc(inline)]
pub use geoalign_trajectory as trajectory;
