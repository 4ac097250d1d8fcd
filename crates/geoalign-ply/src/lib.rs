#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

pub mod header;
pub mod properties;
pub mod transform;

pub use header::{read_header, PlyHeader};
pub use properties::{PlyDataType, PlyProperty};
pub use transform::transform_ply;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write a PLY stream
    #[error("error reading or writing the point-cloud file")]
    Io(#[from] std::io::Error),

    /// The stream does not start with the `ply` format tag
    #[error("not a PLY document, missing the leading format tag")]
    MissingMagic,

    /// The stream ended inside the header
    #[error("stream ended before the header was complete")]
    UnexpectedEof,

    /// The format declaration is not plain-text ASCII
    #[error("unsupported format declaration: {0}")]
    UnsupportedFormat(String),

    /// An element other than a single vertex block was declared
    #[error("unsupported element declaration: {0}")]
    UnsupportedElement(String),

    /// A property declaration the vertex decoder cannot carry
    #[error("unsupported property declaration: {0}")]
    UnsupportedProperty(String),

    /// Not enough properties to locate the vertex coordinates
    #[error("vertex rows carry {0} properties, need at least 3 coordinates")]
    TooFewProperties(usize),

    /// A vertex row with the wrong field count
    #[error("row {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        /// One-based data row number.
        line: usize,
        /// Field count declared by the header.
        expected: usize,
        /// Field count found on the row.
        found: usize,
    },

    /// A vertex coordinate that does not parse as a number
    #[error("row {0}: coordinate fields are not numeric")]
    InvalidVertex(usize),
}
