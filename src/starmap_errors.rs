use thiserror::Error;

use crate::constants::CatalogKey;

/// Line-level parsing errors for catalog, edge and name files.
///
/// Variants
/// -----------------
/// * `TooFewFields` – The row holds fewer fields than the retained columns require.
/// * `TooShortLine` – A fixed-width line does not reach the last mandatory column.
/// * `MissingValue` – A mandatory column is blank.
/// * `InvalidNumber` – A numeric column holds something that is not a number.
/// * `InvalidSexagesimal` – An `hh mm ss` / `±dd mm ss` field could not be decoded.
/// * `InvalidEdgeCount` – A constellation line announces a different number of edges than it lists.
/// * `InvalidStarName` – A star name line does not follow `<hip>|_("<name>")`.
/// * `UnknownColumn` – A retained column is not part of the catalog schema.
/// * `InconsistentVertex` – The same boundary vertex key appears with two different positions.
/// * `InvalidFlag` – A one-character flag column holds an unexpected value.
#[derive(Error, Debug, PartialEq)]
pub enum ParseCatalogError {
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("The line is too short")]
    TooShortLine,
    #[error("Missing value for column {0}")]
    MissingValue(&'static str),
    #[error("Invalid number in column {column}: {value:?}")]
    InvalidNumber { column: &'static str, value: String },
    #[error("Invalid sexagesimal value: {0:?}")]
    InvalidSexagesimal(String),
    #[error("Expected {expected} star ids, found {found}")]
    InvalidEdgeCount { expected: usize, found: usize },
    #[error("Invalid star name line: {0:?}")]
    InvalidStarName(String),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Vertex {0} is listed with two different positions")]
    InconsistentVertex(String),
    #[error("Invalid flag in column {column}: {value:?}")]
    InvalidFlag { column: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum StarmapError {
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Malformed record in {catalog} at line {line}: {source}")]
    MalformedRecord {
        catalog: &'static str,
        line: usize,
        source: ParseCatalogError,
    },

    #[error("Unsupported compression, magic bytes: {0:02x?}")]
    UnsupportedCompression(Vec<u8>),

    #[error("Unknown catalog key: {0}")]
    UnknownKey(CatalogKey),

    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(CatalogKey),

    #[error("Catalog is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Delimited reader error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid chart parameters: {0}")]
    InvalidChartParams(String),
}

impl StarmapError {
    /// Wrap a line-level error with the catalog name and the 1-based line number.
    pub(crate) fn malformed(catalog: &'static str, line: usize, source: ParseCatalogError) -> Self {
        StarmapError::MalformedRecord {
            catalog,
            line,
            source,
        }
    }
}

impl PartialEq for StarmapError {
    fn eq(&self, other: &Self) -> bool {
        use StarmapError::*;
        match (self, other) {
            (MissingDependency(a), MissingDependency(b)) => a == b,
            (
                MalformedRecord {
                    catalog: c1,
                    line: l1,
                    source: s1,
                },
                MalformedRecord {
                    catalog: c2,
                    line: l2,
                    source: s2,
                },
            ) => c1 == c2 && l1 == l2 && s1 == s2,
            (UnsupportedCompression(a), UnsupportedCompression(b)) => a == b,
            (UnknownKey(a), UnknownKey(b)) => a == b,
            (DuplicateKey(a), DuplicateKey(b)) => a == b,
            (InvalidEncoding(a), InvalidEncoding(b)) => a == b,
            (InvalidChartParams(a), InvalidChartParams(b)) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            _ => false,
        }
    }
}
