use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::types::{HexColor, OwnershipEdge, SELF_MARKER};
use crate::error::TableError;

const COLUMNS: [&str; 4] = ["parent", "child", "ownership", "color"];

/// Spreadsheet exports often start with a UTF-8 byte order mark.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Read an ownership table from a CSV file.
pub fn load_table(path: &Path) -> Result<Vec<OwnershipEdge>, TableError> {
    let data = std::fs::read(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let edges = read_table(&data)?;
    tracing::info!("Loaded {} ownership rows from {}", edges.len(), path.display());
    Ok(edges)
}

/// Parse CSV text with a `parent,child,ownership,color` header (any column order).
pub fn parse_table(text: &str) -> Result<Vec<OwnershipEdge>, TableError> {
    read_table(text.as_bytes())
}

fn read_table(data: &[u8]) -> Result<Vec<OwnershipEdge>, TableError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let header = reader.headers().map_err(csv_error)?.clone();

    // Column positions in COLUMNS order
    let mut index = [0usize; 4];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .ok_or(TableError::MissingColumn { column })?;
    }
    let needed = index.iter().copied().max().unwrap_or(0) + 1;

    let mut edges = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record_line(&record);
        if record.len() < needed {
            return Err(TableError::FieldCount {
                line,
                expected: needed,
                found: record.len(),
            });
        }

        let parent = &record[index[0]];
        let child = &record[index[1]];
        let ownership_raw = &record[index[2]];
        let color_raw = &record[index[3]];

        let ownership = parse_ownership(ownership_raw, child == SELF_MARKER).ok_or_else(|| {
            TableError::InvalidOwnership {
                line,
                value: ownership_raw.to_string(),
            }
        })?;
        let color = HexColor::parse(color_raw).ok_or_else(|| TableError::InvalidColor {
            line,
            value: color_raw.to_string(),
        })?;

        edges.push(OwnershipEdge::new(parent, child, ownership, color));
    }

    Ok(edges)
}

fn record_line(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn csv_error(source: csv::Error) -> TableError {
    TableError::Csv {
        line: source.position().map_or(0, |p| p.line() as usize),
        source,
    }
}

/// Regular shares live in (0, 1]. Self markers only carry a placeholder,
/// so any finite non-negative value is accepted for them.
fn parse_ownership(raw: &str, self_marker: bool) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let valid = if self_marker {
        value >= 0.0
    } else {
        value > 0.0 && value <= 1.0
    };
    valid.then_some(value)
}
