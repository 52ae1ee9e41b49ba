use std::path::PathBuf;

use compact_str::CompactString;

/// Failures raised while building a layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The normalizer needs at least one positive, finite weight.
    #[error("invalid ownership weights: {count} weight(s), none usable as a positive share")]
    InvalidWeights { count: usize },

    /// The packer was handed areas that do not cover its container.
    #[error("packed areas sum to {actual} but the container area is {expected}")]
    AreaMismatch { expected: f64, actual: f64 },

    /// Neither the entity nor the Default entity has ownership records.
    #[error("no ownership data for '{entity}' (and none for the Default entity)")]
    NoDataForEntity { entity: CompactString },

    /// Self-only view requested for an entity without a Self record.
    #[error("no Self record for '{entity}' (and none for the Default entity)")]
    MissingSelfMarker { entity: CompactString },
}

/// Failures raised while reading an ownership table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read ownership table {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ownership table has no '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("line {line}: expected at least {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid ownership '{value}'")]
    InvalidOwnership { line: usize, value: String },

    #[error("line {line}: invalid color '{value}' (expected #RRGGBB)")]
    InvalidColor { line: usize, value: String },

    #[error("line {line}: malformed CSV record")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
