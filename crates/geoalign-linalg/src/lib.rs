#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

pub mod linalg;
pub mod rigid;
pub mod svd;
pub mod transforms;

pub use rigid::{fit_transformation, RegistrationError, RigidTransform};
pub use svd::{svd3, Svd3, SvdError};
