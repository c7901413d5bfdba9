//! # Stellarium sky culture files
//!
//! Parsers for the two Stellarium sky-culture files used to decorate a chart:
//!
//! - `constellationship.fab` – stick figures: `<abbr> <n> <hip1> <hip2> … <hip2n>`,
//!   parsed into [`EdgeGroups`] keyed by HIP number.
//! - `star_names.fab` – proper names: `<hip>|_("<name>") <refs>`, parsed into [`StarNames`].
//!
//! Both accept `#` comments and blank lines, and both go through the catalog stream reader,
//! so gzip-compressed copies load the same way as plain ones.
use std::{
    collections::HashMap,
    io::{Cursor, Read, Seek},
    sync::LazyLock,
};

use itertools::Itertools;
use regex::Regex;

use crate::{
    catalogs::reader::read_catalog_bytes,
    constants::CatalogKey,
    edges::{Edge, EdgeGroups},
    starmap_errors::{ParseCatalogError, StarmapError},
};

const CONSTELLATIONSHIP: &str = "constellationship";
const STAR_NAMES: &str = "star names";

static STAR_NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(\d+)\s*\|\s*_\("([^"]*)"\)"#).expect("star name pattern is valid")
});

/// Lines that carry data: not blank, not a `#` comment. Yields 1-based line numbers.
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_hip(value: &str) -> Result<CatalogKey, ParseCatalogError> {
    value
        .parse::<u32>()
        .map(CatalogKey::Int)
        .map_err(|_| ParseCatalogError::InvalidNumber {
            column: "HIP",
            value: value.to_string(),
        })
}

fn parse_figure_line(line: &str) -> Result<(&str, Vec<Edge>), ParseCatalogError> {
    let mut fields = line.split_whitespace();
    let name = fields.next().ok_or(ParseCatalogError::MissingValue("name"))?;
    let count = fields.next().ok_or(ParseCatalogError::MissingValue("count"))?;
    let count: usize = count.parse().map_err(|_| ParseCatalogError::InvalidNumber {
        column: "count",
        value: count.to_string(),
    })?;

    let stars = fields.map(parse_hip).collect::<Result<Vec<_>, _>>()?;
    if stars.len() != 2 * count {
        return Err(ParseCatalogError::InvalidEdgeCount {
            expected: 2 * count,
            found: stars.len(),
        });
    }

    let edges = stars
        .into_iter()
        .tuples()
        .map(|(from, to)| Edge { from, to })
        .collect();
    Ok((name, edges))
}

/// Parse the text of a `constellationship.fab` file.
///
/// Return
/// ----------
/// * One group per constellation abbreviation with its HIP pairs in file order, or a
///   [`StarmapError::MalformedRecord`] on the first bad line (e.g. a wrong edge count).
pub fn parse_constellationship(text: &str) -> Result<EdgeGroups, StarmapError> {
    let mut groups = EdgeGroups::new();
    for (line_number, line) in data_lines(text) {
        let (name, edges) = parse_figure_line(line)
            .map_err(|e| StarmapError::malformed(CONSTELLATIONSHIP, line_number, e))?;
        for edge in edges {
            groups.push_edge(name, edge);
        }
    }
    Ok(groups)
}

/// Read and parse a `constellationship.fab` stream, plain or gzip-compressed.
pub fn read_constellationship<S: Read + Seek>(stream: S) -> Result<EdgeGroups, StarmapError> {
    let content = read_catalog_bytes(stream)?;
    parse_constellationship(std::str::from_utf8(&content)?)
}

/// HIP number → proper name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarNames {
    names: HashMap<CatalogKey, String>,
}

impl StarNames {
    pub fn get(&self, key: &CatalogKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for StarNames {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        StarNames {
            names: iter
                .into_iter()
                .map(|(hip, name)| (CatalogKey::Int(hip), name))
                .collect(),
        }
    }
}

/// Parse the text of a `star_names.fab` file.
///
/// When a star is listed more than once, the last name wins.
pub fn parse_star_names(text: &str) -> Result<StarNames, StarmapError> {
    let entries = data_lines(text)
        .map(|(line_number, line)| {
            let captures = STAR_NAME_LINE.captures(line).ok_or_else(|| {
                StarmapError::malformed(
                    STAR_NAMES,
                    line_number,
                    ParseCatalogError::InvalidStarName(line.to_string()),
                )
            })?;
            let hip = captures[1].parse::<u32>().map_err(|_| {
                StarmapError::malformed(
                    STAR_NAMES,
                    line_number,
                    ParseCatalogError::InvalidNumber {
                        column: "HIP",
                        value: captures[1].to_string(),
                    },
                )
            })?;
            Ok((hip, captures[2].to_string()))
        })
        .collect::<Result<Vec<_>, StarmapError>>()?;

    Ok(entries.into_iter().collect())
}

/// Read and parse a `star_names.fab` stream, plain or gzip-compressed.
pub fn read_star_names<S: Read + Seek>(stream: S) -> Result<StarNames, StarmapError> {
    let content = read_catalog_bytes(stream)?;
    parse_star_names(std::str::from_utf8(&content)?)
}

/// Parse in-memory `constellationship.fab` bytes, plain or gzip-compressed.
pub fn constellationship_from_bytes(bytes: &[u8]) -> Result<EdgeGroups, StarmapError> {
    read_constellationship(Cursor::new(bytes))
}

#[cfg(test)]
mod stellarium_test {
    use super::*;

    const FIGURES: &str = "\
# modern sky culture
Lyr 2 91262 91919 91262 92420

Cyg 3 102098 100453 100453 97165 97165 95947
";

    #[test]
    fn test_parse_constellationship() {
        let groups = parse_constellationship(FIGURES).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.edge_count(), 5);
        assert_eq!(
            groups.get("Lyr").unwrap().edges,
            vec![Edge::new(91262, 91919), Edge::new(91262, 92420)]
        );
        assert_eq!(groups.groups()[1].name, "Cyg");
    }

    #[test]
    fn test_edge_count_mismatch() {
        let err = parse_constellationship("Lyr 2 91262 91919 91262\n").unwrap_err();
        assert_eq!(
            err,
            StarmapError::malformed(
                CONSTELLATIONSHIP,
                1,
                ParseCatalogError::InvalidEdgeCount {
                    expected: 4,
                    found: 3
                }
            )
        );
    }

    #[test]
    fn test_invalid_hip() {
        let err = parse_constellationship("\nLyr 1 91262 Vega\n").unwrap_err();
        assert_eq!(
            err,
            StarmapError::malformed(
                CONSTELLATIONSHIP,
                2,
                ParseCatalogError::InvalidNumber {
                    column: "HIP",
                    value: "Vega".into()
                }
            )
        );
    }

    #[test]
    fn test_parse_star_names() {
        let names = parse_star_names(
            "# names\n 91262|_(\"Vega\") 1,2,5,6,12\n102098|_(\"Deneb\") 1\n102098|_(\"Arided\")\n",
        )
        .unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names.get(&CatalogKey::Int(91262)), Some("Vega"));
        assert_eq!(names.get(&CatalogKey::Int(102098)), Some("Arided"));
        assert_eq!(names.get(&CatalogKey::Int(1)), None);
    }

    #[test]
    fn test_invalid_star_name_line() {
        let err = parse_star_names("91262 Vega\n").unwrap_err();
        assert_eq!(
            err,
            StarmapError::malformed(
                STAR_NAMES,
                1,
                ParseCatalogError::InvalidStarName("91262 Vega".into())
            )
        );
    }
}
