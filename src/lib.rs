//! # starmap
//!
//! Catalog ingestion and constellation geometry for star charts.
//!
//! * [`catalogs`] loads flat astronomical catalogs (plain or gzip) into keyed, typed snapshots.
//! * [`edges`] holds constellation stick figures and parses the Stellarium sky-culture files.
//! * [`geometry`] turns edges plus projected coordinates into segments, polygons and borders.
//! * [`chart`] assembles a renderer-ready [`ChartScene`](chart::ChartScene).
//! * [`export`] writes the Messier catalog as JSON lines.
//!
//! Projection math and rendering are left to the caller, through the
//! [`Projector`](geometry::Projector) seam.
pub mod catalogs;
pub mod chart;
pub mod constants;
pub mod conversion;
pub mod edges;
pub mod export;
pub mod geometry;
pub mod starmap_errors;

pub use catalogs::{Catalog, CatalogFormat, CatalogRecord};
pub use constants::CatalogKey;
pub use starmap_errors::{ParseCatalogError, StarmapError};
