//! ASCII PLY header reading.

use std::io::BufRead;

use crate::properties::{PlyDataType, PlyProperty};
use crate::PlyError;

/// Parsed description of an ASCII PLY vertex stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyHeader {
    /// Vertex count advertised by the `element vertex` declaration, if any.
    pub vertex_count: Option<usize>,
    /// Scalar vertex properties, in declaration order.
    pub properties: Vec<PlyProperty>,
    /// Every header line, `ply` through `end_header`, without terminators.
    pub lines: Vec<String>,
}

impl PlyHeader {
    /// Number of whitespace-separated fields every vertex row must carry.
    pub fn row_width(&self) -> usize {
        self.properties.len()
    }
}

/// Read and validate the header of an ASCII PLY stream.
///
/// Leaves the reader positioned at the first vertex row. The raw header
/// lines are kept so a writer can reproduce the block verbatim. Comments
/// and unrecognized declarations pass through untouched; only the format,
/// element and property declarations are interpreted.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut lines: Vec<String> = Vec::new();
    let mut vertex_count = None;
    let mut is_ascii = false;
    let mut properties = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(if lines.is_empty() {
                PlyError::MissingMagic
            } else {
                PlyError::UnexpectedEof
            });
        }
        let trimmed = line.trim();

        if lines.is_empty() {
            if trimmed != "ply" {
                return Err(PlyError::MissingMagic);
            }
            lines.push(trimmed.to_string());
            continue;
        }
        lines.push(line.trim_end().to_string());

        if trimmed == "end_header" {
            break;
        }

        if trimmed.starts_with("format") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 2 || parts[1] != "ascii" {
                return Err(PlyError::UnsupportedFormat(trimmed.to_string()));
            }
            is_ascii = true;
        } else if trimmed.starts_with("element") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if vertex_count.is_some() || parts.len() < 3 || parts[1] != "vertex" {
                return Err(PlyError::UnsupportedElement(trimmed.to_string()));
            }
            vertex_count = Some(
                parts[2]
                    .parse()
                    .map_err(|_| PlyError::UnsupportedElement(trimmed.to_string()))?,
            );
        } else if trimmed.starts_with("property") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(PlyError::UnsupportedProperty(trimmed.to_string()));
            }
            let data_type = PlyDataType::from_token(parts[1])
                .ok_or_else(|| PlyError::UnsupportedProperty(trimmed.to_string()))?;
            properties.push(PlyProperty {
                name: parts[2].to_string(),
                data_type,
            });
        }
    }

    if !is_ascii {
        return Err(PlyError::UnsupportedFormat("none declared".to_string()));
    }
    if properties.len() < 3 {
        return Err(PlyError::TooFewProperties(properties.len()));
    }

    Ok(PlyHeader {
        vertex_count,
        properties,
        lines,
    })
}
