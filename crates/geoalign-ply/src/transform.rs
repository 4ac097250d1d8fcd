//! Streaming georeferencing of vertex rows.

use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use geoalign_geodesy::GeodeticFrame;
use geoalign_linalg::RigidTransform;

use crate::header::read_header;
use crate::PlyError;

/// Rewrite an ASCII point cloud into geodetic coordinates.
///
/// Streams `input` to `output` one vertex row at a time. Each vertex
/// position is mapped back through the inverse of `transform`, then
/// de-localized with `frame`; the remaining fields of the row are copied
/// through unchanged. Returns the number of vertices written.
///
/// The output file is only created once the header has been validated, so
/// a rejected input never leaves a partial output behind. A mismatch
/// between the advertised vertex count and the streamed row total is
/// logged as a warning, not an error.
pub fn transform_ply(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    transform: &RigidTransform,
    frame: &GeodeticFrame,
) -> Result<usize, PlyError> {
    let file = std::fs::File::open(input)?;
    let mut reader = std::io::BufReader::new(file);
    let header = read_header(&mut reader)?;
    let columns = header.row_width();

    let mut writer = BufWriter::new(std::fs::File::create(output)?);
    for line in &header.lines {
        writeln!(writer, "{}", line)?;
    }

    let mut line = String::new();
    let mut written = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != columns {
            return Err(PlyError::MalformedRow {
                line: written + 1,
                expected: columns,
                found: fields.len(),
            });
        }

        let mut vertex = [0.0; 3];
        for (value, field) in vertex.iter_mut().zip(&fields) {
            *value = field
                .parse()
                .map_err(|_| PlyError::InvalidVertex(written + 1))?;
        }

        let aligned = transform.apply_inverse(&vertex);
        let geodetic = frame.delocalize(&aligned);

        write!(
            writer,
            "{:.16} {:.16} {:.16}",
            geodetic[0], geodetic[1], geodetic[2]
        )?;
        for field in &fields[3..] {
            write!(writer, " {}", field)?;
        }
        writeln!(writer)?;
        written += 1;
    }
    writer.flush()?;

    if let Some(advertised) = header.vertex_count {
        if advertised != written {
            log::warn!(
                "header advertised {} vertices, stream carried {}",
                advertised,
                written
            );
        }
    }

    Ok(written)
}
