//! # Catalog stream reader
//!
//! Byte-level half of the catalog loader: decide whether a stream is gzip-compressed by
//! sniffing its magic bytes, inflate it if needed, then walk the delimited rows and hand
//! only the retained columns to the record parser.
//!
//! ## Compression
//! -----------------
//! The first [`SNIFF_LEN`] bytes are inspected, then the stream is rewound:
//! - `1f 8b` → gzip (requires the `gzip` feature, otherwise [`StarmapError::MissingDependency`]),
//! - ASCII printable/whitespace bytes, or the start of a UTF-8 BOM → plain text,
//! - anything else → [`StarmapError::UnsupportedCompression`].
//!
//! ## Delimiters
//! -----------------
//! - [`Delimiter::Whitespace`] splits on runs of spaces/tabs (blank cells cannot exist).
//! - [`Delimiter::Tab`] and [`Delimiter::Pipe`] go through the `csv` crate with an exact
//!   single-byte separator, so blank cells survive as empty strings and become "missing".
//!
//! Lines starting with [`COMMENT_MARKER`] and blank lines are skipped in every mode.
use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::{
    constants::{COMMENT_MARKER, GZIP_MAGIC, SNIFF_LEN, UTF8_BOM_PREFIX},
    starmap_errors::{ParseCatalogError, StarmapError},
};

/// Compression detected on a catalog stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    PlainText,
    Gzip,
}

impl Compression {
    /// Decide the compression of a stream from its first bytes.
    ///
    /// Arguments
    /// -----------------
    /// * `prefix`: up to [`SNIFF_LEN`] leading bytes of the stream (may be empty).
    ///
    /// Return
    /// ----------
    /// * The detected [`Compression`], or [`StarmapError::UnsupportedCompression`] when the bytes
    ///   are neither gzip magic nor text.
    pub fn sniff(prefix: &[u8]) -> Result<Self, StarmapError> {
        if prefix.starts_with(&GZIP_MAGIC) {
            return Ok(Compression::Gzip);
        }

        let is_text = prefix
            .iter()
            .all(|b| b.is_ascii_graphic() || b.is_ascii_whitespace());

        if is_text || UTF8_BOM_PREFIX.starts_with(prefix) {
            Ok(Compression::PlainText)
        } else {
            Err(StarmapError::UnsupportedCompression(prefix.to_vec()))
        }
    }

    /// Read the whole stream, inflating it when needed.
    fn read_all<R: Read>(self, mut stream: R) -> Result<Vec<u8>, StarmapError> {
        let mut content = Vec::new();
        match self {
            Compression::PlainText => {
                stream.read_to_end(&mut content)?;
            }
            Compression::Gzip => inflate(stream, &mut content)?,
        }
        Ok(content)
    }
}

#[cfg(feature = "gzip")]
fn inflate<R: Read>(stream: R, content: &mut Vec<u8>) -> Result<(), StarmapError> {
    flate2::read::MultiGzDecoder::new(stream).read_to_end(content)?;
    Ok(())
}

#[cfg(not(feature = "gzip"))]
fn inflate<R: Read>(_stream: R, _content: &mut Vec<u8>) -> Result<(), StarmapError> {
    Err(StarmapError::MissingDependency(
        "gzip support (flate2) is disabled, enable the `gzip` feature".into(),
    ))
}

/// Sniff, rewind and fully read a catalog stream.
///
/// The stream is owned for the duration of the call and dropped before returning.
///
/// Arguments
/// -----------------
/// * `stream`: any seekable byte source (file, cursor over bytes, …).
///
/// Return
/// ----------
/// * The decompressed catalog content.
pub fn read_catalog_bytes<S: Read + Seek>(mut stream: S) -> Result<Vec<u8>, StarmapError> {
    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    (&mut stream)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut prefix)?;

    let compression = Compression::sniff(&prefix)?;
    debug!("catalog stream sniffed as {compression:?} (magic {prefix:02x?})");

    stream.seek(SeekFrom::Start(0))?;
    compression.read_all(stream)
}

/// Field separator of a delimited catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Runs of spaces or tabs
    Whitespace,
    /// Exactly one `\t` between cells
    Tab,
    /// Exactly one `|` between cells
    Pipe,
}

impl Delimiter {
    fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Whitespace => None,
            Delimiter::Tab => Some(b'\t'),
            Delimiter::Pipe => Some(b'|'),
        }
    }
}

/// Fixed layout of a delimited catalog: its raw column names, in file order.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSchema {
    /// Name used in diagnostics
    pub name: &'static str,
    /// Source column codes, in file order
    pub columns: &'static [&'static str],
    pub delimiter: Delimiter,
}

/// Source indices of the retained columns, resolved once per load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: Vec<usize>,
    min_fields: usize,
}

impl ColumnMap {
    /// Resolve the retained column names against a schema.
    ///
    /// Arguments
    /// -----------------
    /// * `schema`: the catalog layout.
    /// * `retained`: source column codes to keep, in the order the record parser expects them.
    ///
    /// Return
    /// ----------
    /// * A [`ColumnMap`] whose minimum field count is the highest retained index + 1, or a
    ///   [`StarmapError::MalformedRecord`] carrying [`ParseCatalogError::UnknownColumn`].
    pub fn resolve(schema: &CatalogSchema, retained: &[&str]) -> Result<Self, StarmapError> {
        let indices = retained
            .iter()
            .map(|name| {
                schema
                    .columns
                    .iter()
                    .position(|column| column == name)
                    .ok_or_else(|| {
                        StarmapError::malformed(
                            schema.name,
                            0,
                            ParseCatalogError::UnknownColumn(name.to_string()),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let min_fields = indices.iter().max().map_or(0, |max| max + 1);
        Ok(ColumnMap {
            indices,
            min_fields,
        })
    }

    pub fn min_fields(&self) -> usize {
        self.min_fields
    }

    /// Pick the retained cells out of a full row.
    fn select<'a>(&self, fields: &[&'a str]) -> Result<Vec<&'a str>, ParseCatalogError> {
        if fields.len() < self.min_fields {
            return Err(ParseCatalogError::TooFewFields {
                expected: self.min_fields,
                found: fields.len(),
            });
        }
        Ok(self.indices.iter().map(|&i| fields[i]).collect())
    }
}

/// Walk every data row of a catalog and call `visit` with the 1-based line number and the
/// retained cells.
///
/// The first error, whether from the row layout or from `visit`, aborts the walk.
pub(crate) fn visit_rows<F>(
    content: &[u8],
    schema: &CatalogSchema,
    columns: &ColumnMap,
    mut visit: F,
) -> Result<(), StarmapError>
where
    F: FnMut(usize, &[&str]) -> Result<(), StarmapError>,
{
    let mut apply = |line: usize, fields: &[&str]| -> Result<(), StarmapError> {
        let retained = columns
            .select(fields)
            .map_err(|e| StarmapError::malformed(schema.name, line, e))?;
        visit(line, &retained)
    };

    match schema.delimiter.byte() {
        None => {
            let text = std::str::from_utf8(content)?;
            let text = text.strip_prefix('\u{feff}').unwrap_or(text);

            for (idx, line) in text.lines().enumerate() {
                let trimmed = line.trim_start();
                if trimmed.is_empty() || trimmed.as_bytes()[0] == COMMENT_MARKER {
                    continue;
                }
                let fields: Vec<&str> = trimmed.split_whitespace().collect();
                apply(idx + 1, &fields)?;
            }
        }
        Some(delimiter) => {
            // csv does not count skipped comment lines, so data lines are numbered up front
            let mut kept = Vec::with_capacity(content.len());
            let mut line_numbers = Vec::new();
            let content = content.strip_prefix(b"\xef\xbb\xbf").unwrap_or(content);
            for (idx, raw) in content.split(|&b| b == b'\n').enumerate() {
                let blank = raw
                    .iter()
                    .all(|&b| b.is_ascii_whitespace() || b == delimiter);
                if blank || raw.first() == Some(&COMMENT_MARKER) {
                    continue;
                }
                kept.extend_from_slice(raw);
                kept.push(b'\n');
                line_numbers.push(idx + 1);
            }

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .delimiter(delimiter)
                .quoting(false)
                .flexible(true)
                .from_reader(kept.as_slice());

            for (record, line) in reader.records().zip(line_numbers) {
                let record = record?;
                let fields: Vec<&str> = record.iter().collect();
                apply(line, &fields)?;
            }
        }
    }
    Ok(())
}

/// Parse an optional floating point cell: blank means missing, never zero.
pub(crate) fn parse_optional_f64(
    column: &'static str,
    value: &str,
) -> Result<Option<f64>, ParseCatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ParseCatalogError::InvalidNumber {
            column,
            value: value.to_string(),
        })
}

/// Parse a mandatory floating point cell.
pub(crate) fn parse_required_f64(column: &'static str, value: &str) -> Result<f64, ParseCatalogError> {
    parse_optional_f64(column, value)?.ok_or(ParseCatalogError::MissingValue(column))
}

/// Parse a mandatory integer id cell.
pub(crate) fn parse_required_u32(column: &'static str, value: &str) -> Result<u32, ParseCatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseCatalogError::MissingValue(column));
    }
    value.parse().map_err(|_| ParseCatalogError::InvalidNumber {
        column,
        value: value.to_string(),
    })
}
