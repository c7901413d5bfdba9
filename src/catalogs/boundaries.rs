//! # IAU constellation boundaries
//!
//! Parser for the fixed-width constellation boundary edge file (`edges_18.dat`, epoch B1875).
//!
//! ## Line layout
//! -----------------
//! 1-based byte columns:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 1-3   | key of the 1st vertex |
//! | 5-7   | key of the 2nd vertex |
//! | 9     | edge type, `M`eridian or `P`arallel |
//! | 10    | edge direction, `+` increasing or `-` decreasing |
//! | 12-19 | RA of the 1st vertex, `hh mm ss` |
//! | 21-29 | Dec of the 1st vertex, `±dd mm ss` |
//! | 31-38 | RA of the 2nd vertex |
//! | 40-48 | Dec of the 2nd vertex |
//! | 50-57 | constellation abbreviation(s), space separated |
//!
//! Every vertex becomes a [`BoundaryVertex`] keyed by its vertex key. A vertex is usually listed
//! by several edges; all occurrences must agree on the position (within
//! [`VERTEX_TOLERANCE_DEG`]).
//!
//! An edge naming two constellations (the usual case for a shared border) is added to the edge
//! group of each of them.
use std::{
    collections::HashMap,
    fs::File,
    io::{Cursor, Read, Seek},
    ops::Range,
};

use camino::Utf8Path;
use log::info;

use crate::{
    catalogs::{reader::read_catalog_bytes, Catalog, CatalogRecord},
    constants::{CatalogKey, EpochYear, B1875_EPOCH_YEAR, VERTEX_TOLERANCE_DEG},
    conversion::{parse_dec_to_deg, parse_ra_to_deg, SkyPosition},
    edges::{Edge, EdgeGroups},
    geometry::BorderSegment,
    starmap_errors::{ParseCatalogError, StarmapError},
};

const CATALOG_NAME: &str = "constellation boundaries";

/// Last mandatory byte of a line (end of the 2nd vertex declination).
const MIN_LINE_LEN: usize = 48;

const KEY1: Range<usize> = 0..3;
const KEY2: Range<usize> = 4..7;
const EDGE_TYPE: Range<usize> = 8..9;
const DIRECTION: Range<usize> = 9..10;
const RA1: Range<usize> = 11..19;
const DEC1: Range<usize> = 20..29;
const RA2: Range<usize> = 30..38;
const DEC2: Range<usize> = 39..48;
const CONSTELLATIONS_START: usize = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeType {
    /// Along a meridian (constant RA)
    Meridian,
    /// Along a parallel (constant Dec)
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Increasing,
    Decreasing,
}

impl EdgeType {
    fn from_flag(flag: &str) -> Result<Self, ParseCatalogError> {
        match flag {
            "M" => Ok(EdgeType::Meridian),
            "P" => Ok(EdgeType::Parallel),
            _ => Err(ParseCatalogError::InvalidFlag {
                column: "edge type",
                value: flag.to_string(),
            }),
        }
    }
}

impl EdgeDirection {
    fn from_flag(flag: &str) -> Result<Self, ParseCatalogError> {
        match flag {
            "+" => Ok(EdgeDirection::Increasing),
            "-" => Ok(EdgeDirection::Decreasing),
            _ => Err(ParseCatalogError::InvalidFlag {
                column: "edge direction",
                value: flag.to_string(),
            }),
        }
    }
}

/// A corner of a constellation boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryVertex {
    pub key: CatalogKey,
    pub position: SkyPosition,
    pub epoch_year: EpochYear,
}

impl BoundaryVertex {
    fn same_position(&self, other: &BoundaryVertex) -> bool {
        (self.position.ra_degrees() - other.position.ra_degrees()).abs() <= VERTEX_TOLERANCE_DEG
            && (self.position.dec_degrees() - other.position.dec_degrees()).abs()
                <= VERTEX_TOLERANCE_DEG
    }
}

impl CatalogRecord for BoundaryVertex {
    fn key(&self) -> CatalogKey {
        self.key.clone()
    }

    fn position(&self) -> &SkyPosition {
        &self.position
    }

    fn epoch_year(&self) -> EpochYear {
        self.epoch_year
    }
}

/// One line of the boundary file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryEdge {
    pub from: CatalogKey,
    pub to: CatalogKey,
    pub edge_type: EdgeType,
    pub direction: EdgeDirection,
    /// Abbreviations of the constellations sharing this edge
    pub constellations: Vec<String>,
}

impl BoundaryEdge {
    pub fn edge(&self) -> Edge {
        Edge {
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

fn field(line: &str, range: Range<usize>) -> Result<&str, ParseCatalogError> {
    line.get(range).ok_or(ParseCatalogError::TooShortLine)
}

fn vertex_key(line: &str, range: Range<usize>) -> Result<CatalogKey, ParseCatalogError> {
    let key = field(line, range)?.trim();
    if key.is_empty() {
        return Err(ParseCatalogError::MissingValue("vertex key"));
    }
    Ok(CatalogKey::Name(key.to_string()))
}

fn vertex_position(
    line: &str,
    ra: Range<usize>,
    dec: Range<usize>,
) -> Result<SkyPosition, ParseCatalogError> {
    let ra = field(line, ra)?;
    let dec = field(line, dec)?;
    let ra_degrees =
        parse_ra_to_deg(ra).ok_or_else(|| ParseCatalogError::InvalidSexagesimal(ra.to_string()))?;
    let dec_degrees = parse_dec_to_deg(dec)
        .ok_or_else(|| ParseCatalogError::InvalidSexagesimal(dec.to_string()))?;
    Ok(SkyPosition::from_degrees(ra_degrees, dec_degrees))
}

/// Parse one boundary line into its edge and its two vertices.
fn parse_boundary_line(
    line: &str,
) -> Result<(BoundaryEdge, [BoundaryVertex; 2]), ParseCatalogError> {
    if line.len() < MIN_LINE_LEN {
        return Err(ParseCatalogError::TooShortLine);
    }

    let from = vertex_key(line, KEY1)?;
    let to = vertex_key(line, KEY2)?;

    let constellations: Vec<String> = line
        .get(CONSTELLATIONS_START..)
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if constellations.is_empty() {
        return Err(ParseCatalogError::MissingValue("constellation"));
    }

    let vertices = [
        BoundaryVertex {
            key: from.clone(),
            position: vertex_position(line, RA1, DEC1)?,
            epoch_year: B1875_EPOCH_YEAR,
        },
        BoundaryVertex {
            key: to.clone(),
            position: vertex_position(line, RA2, DEC2)?,
            epoch_year: B1875_EPOCH_YEAR,
        },
    ];

    let edge = BoundaryEdge {
        from,
        to,
        edge_type: EdgeType::from_flag(field(line, EDGE_TYPE)?)?,
        direction: EdgeDirection::from_flag(field(line, DIRECTION)?)?,
        constellations,
    };
    Ok((edge, vertices))
}

/// Parsed boundary file: deduplicated vertices, the raw edges, and the edges grouped by
/// constellation.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryData {
    vertices: Catalog<BoundaryVertex>,
    edges: Vec<BoundaryEdge>,
    groups: EdgeGroups,
}

impl BoundaryData {
    /// Parse the text of a boundary file.
    ///
    /// Return
    /// ----------
    /// * The boundary data, or a [`StarmapError::MalformedRecord`] for the first bad line,
    ///   including a vertex key listed with two different positions.
    pub fn parse(text: &str) -> Result<Self, StarmapError> {
        let mut vertices: Vec<BoundaryVertex> = Vec::new();
        let mut seen: HashMap<CatalogKey, usize> = HashMap::new();
        let mut edges = Vec::new();
        let mut groups = EdgeGroups::new();

        for (idx, line) in text.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let malformed = |e: ParseCatalogError| StarmapError::malformed(CATALOG_NAME, line_number, e);
            let (edge, line_vertices) = parse_boundary_line(line).map_err(malformed)?;

            for vertex in line_vertices {
                match seen.get(&vertex.key) {
                    Some(&i) if !vertices[i].same_position(&vertex) => {
                        return Err(malformed(ParseCatalogError::InconsistentVertex(
                            vertex.key.to_string(),
                        )));
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(vertex.key.clone(), vertices.len());
                        vertices.push(vertex);
                    }
                }
            }

            for constellation in &edge.constellations {
                groups.push_edge(constellation, edge.edge());
            }
            edges.push(edge);
        }

        Ok(BoundaryData {
            vertices: Catalog::from_records(vertices)?,
            edges,
            groups,
        })
    }

    /// Read and parse a boundary stream, plain or gzip-compressed.
    pub fn from_reader<S: Read + Seek>(stream: S) -> Result<Self, StarmapError> {
        let content = read_catalog_bytes(stream)?;
        Self::parse(std::str::from_utf8(&content)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StarmapError> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_path(path: &Utf8Path) -> Result<Self, StarmapError> {
        let data = Self::from_reader(File::open(path)?)?;
        info!(
            "loaded {} boundary edges and {} vertices ({path})",
            data.edges.len(),
            data.vertices.len()
        );
        Ok(data)
    }

    pub fn vertices(&self) -> &Catalog<BoundaryVertex> {
        &self.vertices
    }

    /// Edges in file order.
    pub fn edges(&self) -> &[BoundaryEdge] {
        &self.edges
    }

    /// Edges grouped by constellation abbreviation.
    pub fn edge_groups(&self) -> &EdgeGroups {
        &self.groups
    }

    /// Border segments ready for border assembly.
    ///
    /// Within each constellation group, runs of contiguous edges (`edge.to == next.from`) are
    /// chained into one multi-vertex segment, so an outline listed in order becomes a single
    /// segment whose last vertex repeats the first. An edge shared by two constellations
    /// belongs to both outlines.
    pub fn border_segments(&self) -> Vec<BorderSegment> {
        let mut segments = Vec::new();
        for group in self.groups.groups() {
            let mut runs: Vec<Vec<CatalogKey>> = Vec::new();
            for edge in &group.edges {
                match runs.last_mut() {
                    Some(run) if run.last() == Some(&edge.from) => run.push(edge.to.clone()),
                    _ => runs.push(vec![edge.from.clone(), edge.to.clone()]),
                }
            }
            segments.extend(runs.into_iter().enumerate().map(|(i, vertices)| BorderSegment {
                id: format!("{}:{i}", group.name),
                vertices,
            }));
        }
        segments
    }
}
