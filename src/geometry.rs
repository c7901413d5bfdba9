//! # Edge geometry assembly
//!
//! Turns grouped catalog-key edges into renderable 2D primitives, once an external
//! [`Projector`] has attached a projected coordinate to every catalog entry.
//!
//! ## Modes
//! -----------------
//! * [`LineMode::Segments`] – one [`Segment`] per edge, groups in order, edges in insertion order.
//! * [`LineMode::Polygon`] – one closed [`Polygon`] per group whose vertices are the first keys
//!   of the group's edges, in order. This is a separate primitive, not a chain of segments.
//! * Border mode ([`assemble_borders`]) – input is ordered point sequences, not edges. The
//!   [`BorderPolicy`] decides whether every consecutive pair becomes a segment or only the first
//!   pair does.
//!
//! ## Missing coordinates
//! -----------------
//! A key absent from the [`CoordinateLookup`] fails with [`StarmapError::UnknownKey`]. Edges are
//! never silently skipped, in any mode and under any policy.
//!
//! ## Example
//! -----------------
//! ```rust
//! use std::collections::HashMap;
//! use nalgebra::Point2;
//! use starmap::constants::CatalogKey;
//! use starmap::edges::{Edge, EdgeGroups};
//! use starmap::geometry::{assemble_lines, Geometry, LineMode};
//!
//! let mut groups = EdgeGroups::new();
//! groups.push_edge("Tri", Edge::new("A", "B"));
//!
//! let lookup: HashMap<CatalogKey, Point2<f64>> = HashMap::from([
//!     (CatalogKey::from("A"), Point2::new(0.0, 0.0)),
//!     (CatalogKey::from("B"), Point2::new(1.0, 1.0)),
//! ]);
//!
//! let Geometry::Segments(segments) = assemble_lines(&groups, &lookup, LineMode::Segments).unwrap()
//! else { unreachable!() };
//! assert_eq!(segments.len(), 1);
//! ```
use std::collections::HashMap;

use itertools::Itertools;
use nalgebra::Point2;

use crate::{
    constants::{CatalogKey, EpochYear},
    conversion::SkyPosition,
    edges::EdgeGroups,
    starmap_errors::StarmapError,
};

/// Source of projected chart coordinates by catalog key.
pub trait CoordinateLookup {
    fn position(&self, key: &CatalogKey) -> Option<Point2<f64>>;

    /// Like [`position`](CoordinateLookup::position) but a missing key is an error.
    fn resolve(&self, key: &CatalogKey) -> Result<Point2<f64>, StarmapError> {
        self.position(key)
            .ok_or_else(|| StarmapError::UnknownKey(key.clone()))
    }
}

impl CoordinateLookup for HashMap<CatalogKey, Point2<f64>> {
    fn position(&self, key: &CatalogKey) -> Option<Point2<f64>> {
        self.get(key).copied()
    }
}

/// Sky → chart plane transform, supplied by the caller (ephemeris and projection code).
pub trait Projector {
    fn project(&self, position: &SkyPosition, epoch_year: EpochYear) -> Point2<f64>;
}

impl<F> Projector for F
where
    F: Fn(&SkyPosition, EpochYear) -> Point2<f64>,
{
    fn project(&self, position: &SkyPosition, epoch_year: EpochYear) -> Point2<f64> {
        self(position, epoch_year)
    }
}

/// Projected coordinates attached to catalog entries.
///
/// This is the only mutable enrichment of a loaded catalog; the catalog itself stays untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTable {
    positions: HashMap<CatalogKey, Point2<f64>>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PositionTable {
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Attach (or replace) the coordinate of `key`.
    pub fn insert(&mut self, key: CatalogKey, point: Point2<f64>) -> Option<Point2<f64>> {
        self.positions.insert(key, point)
    }

    pub fn get(&self, key: &CatalogKey) -> Option<Point2<f64>> {
        self.positions.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CatalogKey, &Point2<f64>)> + '_ {
        self.positions.iter()
    }
}

impl CoordinateLookup for PositionTable {
    fn position(&self, key: &CatalogKey) -> Option<Point2<f64>> {
        self.get(key)
    }
}

impl Extend<(CatalogKey, Point2<f64>)> for PositionTable {
    fn extend<I: IntoIterator<Item = (CatalogKey, Point2<f64>)>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

impl FromIterator<(CatalogKey, Point2<f64>)> for PositionTable {
    fn from_iter<I: IntoIterator<Item = (CatalogKey, Point2<f64>)>>(iter: I) -> Self {
        PositionTable {
            positions: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Segment { start, end }
    }
}

/// Closed outline; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub group: String,
    pub vertices: Vec<Point2<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Segments(Vec<Segment>),
    Polygons(Vec<Polygon>),
}

impl Geometry {
    /// Number of primitives
    pub fn len(&self) -> usize {
        match self {
            Geometry::Segments(segments) => segments.len(),
            Geometry::Polygons(polygons) => polygons.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    #[default]
    Segments,
    Polygon,
}

/// How a border point sequence is turned into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// `n` points give `n - 1` segments.
    #[default]
    ConsecutivePairs,
    /// Only the first two points give a segment; the rest of the sequence is ignored.
    FirstPairOnly,
}

/// Ordered vertex keys of one boundary piece.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSegment {
    pub id: String,
    pub vertices: Vec<CatalogKey>,
}

/// Build line geometry from edge groups.
///
/// Arguments
/// -----------------
/// * `groups`: the edges to draw, grouped by name.
/// * `lookup`: projected coordinate of every key referenced by an edge.
/// * `mode`: independent segments or one closed polygon per group.
///
/// Return
/// ----------
/// * The geometry, or [`StarmapError::UnknownKey`] for the first edge key without a coordinate.
///   Both keys of every edge are resolved in polygon mode too, even though only the first one
///   becomes a vertex.
///
/// See also
/// ------------
/// * [`assemble_borders`] – Border mode over point sequences.
pub fn assemble_lines<L: CoordinateLookup + ?Sized>(
    groups: &EdgeGroups,
    lookup: &L,
    mode: LineMode,
) -> Result<Geometry, StarmapError> {
    match mode {
        LineMode::Segments => groups
            .edges()
            .map(|edge| {
                Ok(Segment::new(
                    lookup.resolve(&edge.from)?,
                    lookup.resolve(&edge.to)?,
                ))
            })
            .collect::<Result<Vec<_>, StarmapError>>()
            .map(Geometry::Segments),
        LineMode::Polygon => groups
            .groups()
            .iter()
            .filter(|group| !group.edges.is_empty())
            .map(|group| {
                let vertices = group
                    .edges
                    .iter()
                    .map(|edge| {
                        lookup.resolve(&edge.to)?;
                        lookup.resolve(&edge.from)
                    })
                    .collect::<Result<Vec<_>, StarmapError>>()?;
                Ok(Polygon {
                    group: group.name.clone(),
                    vertices,
                })
            })
            .collect::<Result<Vec<_>, StarmapError>>()
            .map(Geometry::Polygons),
    }
}

/// Segments of one border point sequence.
///
/// Sequences with fewer than two points produce nothing under either policy.
pub fn border_segments(points: &[Point2<f64>], policy: BorderPolicy) -> Vec<Segment> {
    match policy {
        BorderPolicy::ConsecutivePairs => points
            .iter()
            .tuple_windows()
            .map(|(start, end)| Segment::new(*start, *end))
            .collect(),
        BorderPolicy::FirstPairOnly => match points {
            [start, end, ..] => vec![Segment::new(*start, *end)],
            _ => Vec::new(),
        },
    }
}

/// Resolve every border piece and flatten it into segments, in input order.
///
/// Every vertex key is resolved, including those a [`BorderPolicy::FirstPairOnly`] policy
/// does not draw, so a catalog mismatch is always reported as [`StarmapError::UnknownKey`].
pub fn assemble_borders<L: CoordinateLookup + ?Sized>(
    segments: &[BorderSegment],
    lookup: &L,
    policy: BorderPolicy,
) -> Result<Vec<Segment>, StarmapError> {
    let mut lines = Vec::new();
    for segment in segments {
        let points = segment
            .vertices
            .iter()
            .map(|key| lookup.resolve(key))
            .collect::<Result<Vec<_>, _>>()?;
        lines.extend(border_segments(&points, policy));
    }
    Ok(lines)
}
