//! Vertex property declarations of a PLY header.

/// Scalar data types a vertex property can be declared with.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyDataType {
    /// 32-bit float, declared `float` or `float32`.
    Float32,
    /// 64-bit float, declared `double` or `float64`.
    Float64,
    /// Signed byte, declared `char` or `int8`.
    Int8,
    /// Unsigned byte, declared `uchar` or `uint8`.
    UInt8,
    /// Signed 16-bit integer, declared `short` or `int16`.
    Int16,
    /// Unsigned 16-bit integer, declared `ushort` or `uint16`.
    UInt16,
    /// Signed 32-bit integer, declared `int` or `int32`.
    Int32,
    /// Unsigned 32-bit integer, declared `uint` or `uint32`.
    UInt32,
}

impl PlyDataType {
    /// Parse a header type token, `None` for unknown or list types.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "float" | "float32" => Some(PlyDataType::Float32),
            "double" | "float64" => Some(PlyDataType::Float64),
            "char" | "int8" => Some(PlyDataType::Int8),
            "uchar" | "uint8" => Some(PlyDataType::UInt8),
            "short" | "int16" => Some(PlyDataType::Int16),
            "ushort" | "uint16" => Some(PlyDataType::UInt16),
            "int" | "int32" => Some(PlyDataType::Int32),
            "uint" | "uint32" => Some(PlyDataType::UInt32),
            _ => None,
        }
    }
}

/// One scalar per-vertex property, in header declaration order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PlyProperty {
    /// Property name as declared in the header.
    pub name: String,
    /// Declared scalar type.
    pub data_type: PlyDataType,
}
