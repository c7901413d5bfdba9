//! # Chart assembly
//!
//! Everything a renderer needs to draw a stereographic star chart, computed from loaded
//! catalogs, an explicit observer context and an external [`Projector`].
//!
//! ## Overview
//! -----------------
//! A chart is centered on the point the observer looks at and spans
//! [`ChartParams::field_of_view_degrees`]. In the projected plane this field is the square
//! `[-limit, limit]²` with `limit = field_limit(fov)` (1.0 for a 180° field, i.e. the horizon).
//!
//! [`ChartScene::assemble`] produces:
//! * constellation stick figures (line or polygon mode),
//! * constellation borders from the IAU boundary file (border mode),
//! * star and deep-sky markers sized by magnitude,
//! * labels for named stars, Messier objects and constellation centers **inside the field only**,
//! * telrad ring radii and a title.
//!
//! The renderer itself (matplotlib-like scatter/line/patch calls, image output) is not part of
//! this crate.
//!
//! ## Example
//! -----------------
//! ```rust,no_run
//! use hifitime::Epoch;
//! use starmap::chart::{ChartParams, ObserverContext};
//! use starmap::geometry::LineMode;
//!
//! let params = ChartParams::builder()
//!     .field_of_view_degrees(18.0)
//!     .limiting_magnitude(8.0)
//!     .line_mode(LineMode::Segments)
//!     .build()
//!     .unwrap();
//!
//! let observer = ObserverContext::new(
//!     "Amsterdam",
//!     52.377956,
//!     4.897070,
//!     28.0,
//!     Epoch::from_gregorian_utc_hms(1976, 10, 17, 4, 25, 0),
//! )
//! .unwrap()
//! .facing(180.0);
//!
//! assert_eq!(observer.direction(), "South");
//! ```
use std::f64::consts::PI;
use std::str::FromStr;

use hifitime::efmt::{Format, Formatter};
use hifitime::{Epoch, TimeScale};
use log::info;
use nalgebra::Point2;

use crate::{
    catalogs::{
        BoundaryData, Catalog, CatalogRecord, ConstellationCenter, DeepSkyObject, HipparcosStar,
    },
    constants::{CatalogKey, Degree, Magnitude},
    edges::{stellarium::StarNames, EdgeGroups},
    geometry::{
        assemble_borders, assemble_lines, BorderPolicy, CoordinateLookup, Geometry, LineMode,
        Projector, Segment,
    },
    starmap_errors::StarmapError,
};

/// Telrad finder rings, in degrees of sky.
pub const TELRAD_RING_DEGREES: [Degree; 5] = [16.0, 8.0, 4.0, 2.0, 0.2];

/// Shift `(dx, dy)` applied to star and DSO labels so they do not cover the marker.
pub const LABEL_OFFSET: (f64, f64) = (0.004, -0.004);

const TITLE_DATE_FORMAT: &str = "%Y %B %d %H:%M";

const CARDINALS: [&str; 4] = ["North", "East", "South", "West"];

/// Half-width of the projected plane covered by a field of view.
///
/// Stereographic projection: `a = π − fov/360·π`, `limit = sin a / (1 − cos a)`.
pub fn field_limit(field_of_view_degrees: Degree) -> f64 {
    let angle = PI - field_of_view_degrees / 360.0 * PI;
    angle.sin() / (1.0 - angle.cos())
}

/// Projected radius of a circle of `degrees` around the chart center.
pub fn telrad_radius(degrees: Degree) -> f64 {
    field_limit(degrees)
}

/// Radii of the telrad rings, in [`TELRAD_RING_DEGREES`] order.
pub fn telrad_rings() -> Vec<f64> {
    TELRAD_RING_DEGREES.iter().map(|&d| telrad_radius(d)).collect()
}

/// Scatter marker area: `(offset + limit − magnitude)²`.
pub fn marker_size(magnitude: Magnitude, limit: Magnitude, offset: f64) -> f64 {
    (offset + limit - magnitude).powi(2)
}

/// Parameters of a chart.
///
/// Defaults reproduce the full-sky chart: 180° field, stars to magnitude 6, deep-sky objects to
/// magnitude 8.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartParams {
    pub field_of_view_degrees: Degree,
    pub limiting_magnitude: Magnitude,
    pub dso_limit_magnitude: Magnitude,
    pub star_marker_offset: f64,
    pub dso_marker_offset: f64,
    pub border_policy: BorderPolicy,
    pub line_mode: LineMode,
}

impl ChartParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`ChartParamsBuilder`] starting from the defaults.
    ///
    /// See also
    /// ------------
    /// * [`ChartParamsBuilder::build`] – Validation rules.
    pub fn builder() -> ChartParamsBuilder {
        ChartParamsBuilder::new()
    }

    /// Half-width of the projected field.
    pub fn limit(&self) -> f64 {
        field_limit(self.field_of_view_degrees)
    }
}

impl Default for ChartParams {
    fn default() -> Self {
        ChartParams {
            field_of_view_degrees: 180.0,
            limiting_magnitude: 6.0,
            dso_limit_magnitude: 8.0,
            star_marker_offset: 0.7,
            dso_marker_offset: 0.9,
            border_policy: BorderPolicy::ConsecutivePairs,
            line_mode: LineMode::Segments,
        }
    }
}

/// Builder for [`ChartParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ChartParamsBuilder {
    params: ChartParams,
}

impl ChartParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_of_view_degrees(mut self, v: Degree) -> Self {
        self.params.field_of_view_degrees = v;
        self
    }

    pub fn limiting_magnitude(mut self, v: Magnitude) -> Self {
        self.params.limiting_magnitude = v;
        self
    }

    pub fn dso_limit_magnitude(mut self, v: Magnitude) -> Self {
        self.params.dso_limit_magnitude = v;
        self
    }

    pub fn star_marker_offset(mut self, v: f64) -> Self {
        self.params.star_marker_offset = v;
        self
    }

    pub fn dso_marker_offset(mut self, v: f64) -> Self {
        self.params.dso_marker_offset = v;
        self
    }

    pub fn border_policy(mut self, v: BorderPolicy) -> Self {
        self.params.border_policy = v;
        self
    }

    pub fn line_mode(mut self, v: LineMode) -> Self {
        self.params.line_mode = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Rules
    /// -----------------
    /// * `0 < field_of_view_degrees < 360` (a 360° field has no finite limit).
    /// * Both limiting magnitudes are finite.
    /// * Both marker offsets are finite and non-negative.
    ///
    /// Return
    /// ----------
    /// * The parameters, or [`StarmapError::InvalidChartParams`] naming the first broken rule.
    pub fn build(self) -> Result<ChartParams, StarmapError> {
        let p = &self.params;

        if !(p.field_of_view_degrees > 0.0 && p.field_of_view_degrees < 360.0) {
            return Err(StarmapError::InvalidChartParams(format!(
                "field_of_view_degrees must be in (0, 360), got {}",
                p.field_of_view_degrees
            )));
        }
        if !p.limiting_magnitude.is_finite() || !p.dso_limit_magnitude.is_finite() {
            return Err(StarmapError::InvalidChartParams(
                "limiting magnitudes must be finite".into(),
            ));
        }
        for (name, offset) in [
            ("star_marker_offset", p.star_marker_offset),
            ("dso_marker_offset", p.dso_marker_offset),
        ] {
            if !(offset.is_finite() && offset >= 0.0) {
                return Err(StarmapError::InvalidChartParams(format!(
                    "{name} must be finite and non-negative, got {offset}"
                )));
            }
        }

        Ok(self.params)
    }
}

/// Where, when and towards which azimuth the chart is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverContext {
    pub name: String,
    pub latitude_degrees: Degree,
    pub longitude_degrees: Degree,
    pub elevation_m: f64,
    pub epoch: Epoch,
    /// 0 = North, 180 = South
    pub azimuth_degrees: Degree,
}

impl ObserverContext {
    /// Observer facing North.
    ///
    /// Return
    /// ----------
    /// * The context, or [`StarmapError::InvalidChartParams`] if latitude is outside `[-90, 90]`
    ///   or longitude outside `[-180, 360]`.
    pub fn new(
        name: impl Into<String>,
        latitude_degrees: Degree,
        longitude_degrees: Degree,
        elevation_m: f64,
        epoch: Epoch,
    ) -> Result<Self, StarmapError> {
        if !(-90.0..=90.0).contains(&latitude_degrees) {
            return Err(StarmapError::InvalidChartParams(format!(
                "latitude must be in [-90, 90], got {latitude_degrees}"
            )));
        }
        if !(-180.0..=360.0).contains(&longitude_degrees) {
            return Err(StarmapError::InvalidChartParams(format!(
                "longitude must be in [-180, 360], got {longitude_degrees}"
            )));
        }
        Ok(ObserverContext {
            name: name.into(),
            latitude_degrees,
            longitude_degrees,
            elevation_m,
            epoch,
            azimuth_degrees: 0.0,
        })
    }

    pub fn facing(mut self, azimuth_degrees: Degree) -> Self {
        self.azimuth_degrees = azimuth_degrees;
        self
    }

    /// Nearest cardinal direction of the azimuth.
    pub fn direction(&self) -> &'static str {
        let azimuth = self.azimuth_degrees.rem_euclid(360.0);
        let idx = ((azimuth + 45.0) / 90.0).floor() as usize % CARDINALS.len();
        CARDINALS[idx]
    }

    /// `"To the <direction> in <name> on <YYYY Month DD HH:MM> UTC"`
    ///
    /// The epoch is shown in UTC whatever time scale it was built in.
    pub fn title(&self) -> Result<String, StarmapError> {
        let format = Format::from_str(TITLE_DATE_FORMAT)
            .map_err(|e| StarmapError::InvalidChartParams(format!("title date format: {e}")))?;
        let date = Formatter::new(self.epoch.to_time_scale(TimeScale::UTC), format);
        Ok(format!(
            "To the {} in {} on {date} UTC",
            self.direction(),
            self.name
        ))
    }
}

/// A scatter marker for one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: CatalogKey,
    pub position: Point2<f64>,
    pub size: f64,
    pub magnitude: Magnitude,
    pub label: Option<String>,
}

impl Marker {
    /// Strictly inside `(-limit, limit)` on both axes.
    pub fn is_in_view(&self, limit: f64) -> bool {
        in_view(&self.position, limit)
    }
}

fn label_anchor(marker: &Point2<f64>) -> Point2<f64> {
    Point2::new(marker.x + LABEL_OFFSET.0, marker.y + LABEL_OFFSET.1)
}

fn in_view(point: &Point2<f64>, limit: f64) -> bool {
    -limit < point.x && point.x < limit && -limit < point.y && point.y < limit
}

/// Markers for every record with a known magnitude at or below `limit`, in catalog order.
///
/// Arguments
/// -----------------
/// * `catalog`: the records to filter.
/// * `positions`: projected coordinates of the records.
/// * `limit`: limiting magnitude.
/// * `offset`: marker size offset, see [`marker_size`].
///
/// Return
/// ----------
/// * The markers, or [`StarmapError::UnknownKey`] for a bright record without a coordinate.
pub fn bright_markers<R, L>(
    catalog: &Catalog<R>,
    positions: &L,
    limit: Magnitude,
    offset: f64,
) -> Result<Vec<Marker>, StarmapError>
where
    R: CatalogRecord,
    L: CoordinateLookup + ?Sized,
{
    catalog
        .iter()
        .filter_map(|record| record.magnitude().filter(|&m| m <= limit).map(|m| (record, m)))
        .map(|(record, magnitude)| {
            let key = record.key();
            Ok(Marker {
                position: positions.resolve(&key)?,
                size: marker_size(magnitude, limit, offset),
                magnitude,
                label: record.label().map(str::to_string),
                key,
            })
        })
        .collect()
}

/// A text annotation anchored on the chart plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point2<f64>,
}

/// Borrowed inputs of a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartCatalogs<'a> {
    pub stars: &'a Catalog<HipparcosStar>,
    pub dsos: &'a Catalog<DeepSkyObject>,
    /// Stick figures, keyed by HIP number
    pub constellations: &'a EdgeGroups,
    pub centers: Option<&'a Catalog<ConstellationCenter>>,
    pub boundaries: Option<&'a BoundaryData>,
    pub star_names: Option<&'a StarNames>,
}

/// Renderer-ready content of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub title: String,
    /// Half-width of the projected field
    pub limit: f64,
    pub telrad_rings: Vec<f64>,
    pub constellation_lines: Geometry,
    pub borders: Vec<Segment>,
    pub stars: Vec<Marker>,
    pub dsos: Vec<Marker>,
    pub star_labels: Vec<Label>,
    pub dso_labels: Vec<Label>,
    pub center_labels: Vec<Label>,
}

impl ChartScene {
    /// Project every catalog and build the chart content.
    ///
    /// Arguments
    /// -----------------
    /// * `observer`: place, time and viewing direction (used for the title; the projector is
    ///   expected to be built for the same observer).
    /// * `params`: validated chart parameters.
    /// * `catalogs`: star, DSO, figure, center, boundary and name inputs.
    /// * `projector`: sky → chart plane transform.
    ///
    /// Return
    /// ----------
    /// * The scene, or the first [`StarmapError::UnknownKey`] raised while resolving figure
    ///   edges, border vertices or bright markers.
    pub fn assemble<P: Projector + ?Sized>(
        observer: &ObserverContext,
        params: &ChartParams,
        catalogs: &ChartCatalogs<'_>,
        projector: &P,
    ) -> Result<Self, StarmapError> {
        let limit = params.limit();

        let star_positions = catalogs.stars.project(projector);
        let dso_positions = catalogs.dsos.project(projector);

        let constellation_lines =
            assemble_lines(catalogs.constellations, &star_positions, params.line_mode)?;

        let borders = match catalogs.boundaries {
            Some(boundaries) => {
                let vertex_positions = boundaries.vertices().project(projector);
                assemble_borders(
                    &boundaries.border_segments(),
                    &vertex_positions,
                    params.border_policy,
                )?
            }
            None => Vec::new(),
        };

        let stars = bright_markers(
            catalogs.stars,
            &star_positions,
            params.limiting_magnitude,
            params.star_marker_offset,
        )?;
        let dsos = bright_markers(
            catalogs.dsos,
            &dso_positions,
            params.dso_limit_magnitude,
            params.dso_marker_offset,
        )?;

        let star_labels = match catalogs.star_names {
            Some(names) => stars
                .iter()
                .filter(|m| m.is_in_view(limit))
                .filter_map(|m| {
                    names.get(&m.key).map(|name| Label {
                        text: name.to_string(),
                        position: label_anchor(&m.position),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        let dso_labels = dsos
            .iter()
            .filter(|m| m.is_in_view(limit))
            .filter_map(|m| {
                m.label.as_ref().map(|text| Label {
                    text: text.clone(),
                    position: label_anchor(&m.position),
                })
            })
            .collect();

        let center_labels = match catalogs.centers {
            Some(centers) => centers
                .iter()
                .map(|center| Label {
                    text: center.name.clone(),
                    position: projector.project(center.position(), center.epoch_year()),
                })
                .filter(|label| in_view(&label.position, limit))
                .collect(),
            None => Vec::new(),
        };

        let scene = ChartScene {
            title: observer.title()?,
            limit,
            telrad_rings: telrad_rings(),
            constellation_lines,
            borders,
            stars,
            dsos,
            star_labels,
            dso_labels,
            center_labels,
        };

        info!(
            "assembled chart '{}': {} stars, {} deep-sky objects, {} figure primitives, {} border segments",
            scene.title,
            scene.stars.len(),
            scene.dsos.len(),
            scene.constellation_lines.len(),
            scene.borders.len()
        );
        Ok(scene)
    }
}
