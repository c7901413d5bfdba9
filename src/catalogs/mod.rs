//! # Catalog ingestion
//!
//! Typed, keyed snapshots of flat astronomical catalogs.
//!
//! ## Overview
//! -----------------
//! Every catalog kind is a strongly typed record struct implementing [`CatalogRecord`]
//! (the common read-only view used by the geometry and chart code) and, for delimited
//! catalogs, [`CatalogFormat`] (its fixed column layout and row parser). A loaded catalog is a
//! [`Catalog<R>`]: records in file order plus a key index for O(1) lookup.
//!
//! | Kind | Source | Key | Epoch |
//! |------|--------|-----|-------|
//! | [`ConstellationCenter`] | whitespace-delimited centers file | `Name` | 2000.0 |
//! | [`DeepSkyObject`] | Stellarium `catalog.txt` (tab) | `DSOID` | 2000.0 |
//! | [`HipparcosStar`] | `hip_main.dat` (pipe) | `HIP` | 1991.25 |
//! | [`BoundaryVertex`] | IAU boundary edge file (fixed width) | vertex key | 1875.0 |
//!
//! ## Loading pipeline
//! -----------------
//! 1. [`read_catalog_bytes`](crate::catalogs::reader::read_catalog_bytes) sniffs the compression,
//!    rewinds and reads the whole stream.
//! 2. A [`ColumnMap`](crate::catalogs::reader::ColumnMap) is resolved once from
//!    [`CatalogFormat::SCHEMA`] and [`CatalogFormat::RETAINED`].
//! 3. Each data row is reduced to its retained cells and handed to
//!    [`CatalogFormat::from_fields`]; `Ok(None)` drops the row by policy, an error aborts the load.
//! 4. Records are indexed by key; a repeated key fails with [`StarmapError::DuplicateKey`].
//!
//! ## Example
//! -----------------
//! ```rust,no_run
//! use camino::Utf8Path;
//! use starmap::catalogs::{Catalog, CatalogRecord, DeepSkyObject};
//!
//! let dsos: Catalog<DeepSkyObject> =
//!     Catalog::from_path(Utf8Path::new("data/catalog.txt")).unwrap();
//! let m42 = dsos.find_by_label("M42").unwrap();
//! println!("{} at {:.3}h", m42.label().unwrap(), m42.ra_hours());
//! ```
pub mod boundaries;
pub mod constellation_centers;
pub mod dsos;
pub mod hipparcos;
pub mod reader;

use std::{
    collections::HashMap,
    fs::File,
    io::{Cursor, Read, Seek},
};

use camino::Utf8Path;
use log::{debug, info};

use crate::{
    constants::{CatalogKey, Degree, EpochYear, Hour, Magnitude},
    conversion::SkyPosition,
    geometry::{PositionTable, Projector},
    starmap_errors::{ParseCatalogError, StarmapError},
};

use reader::{read_catalog_bytes, visit_rows, CatalogSchema, ColumnMap};

pub use boundaries::{BoundaryData, BoundaryEdge, BoundaryVertex, EdgeDirection, EdgeType};
pub use constellation_centers::ConstellationCenter;
pub use dsos::DeepSkyObject;
pub use hipparcos::HipparcosStar;

/// Common read-only view over one catalog entry.
pub trait CatalogRecord {
    /// Unique key of the entry inside its catalog
    fn key(&self) -> CatalogKey;

    /// Equatorial position at [`epoch_year`](CatalogRecord::epoch_year)
    fn position(&self) -> &SkyPosition;

    fn ra_degrees(&self) -> Degree {
        self.position().ra_degrees()
    }

    fn ra_hours(&self) -> Hour {
        self.position().ra_hours()
    }

    fn dec_degrees(&self) -> Degree {
        self.position().dec_degrees()
    }

    /// Apparent magnitude, `None` when the catalog has no value
    fn magnitude(&self) -> Option<Magnitude> {
        None
    }

    /// Display name, if the catalog provides or derives one
    fn label(&self) -> Option<&str> {
        None
    }

    /// Reference epoch of the coordinates, attached at load time
    fn epoch_year(&self) -> EpochYear;
}

/// Fixed delimited layout and row parser of one catalog kind.
pub trait CatalogFormat: CatalogRecord + Sized {
    /// Raw layout of the source file
    const SCHEMA: CatalogSchema;

    /// Source columns kept by the loader, in the order [`from_fields`](CatalogFormat::from_fields) reads them
    const RETAINED: &'static [&'static str];

    /// Build a record from the retained cells of one row.
    ///
    /// Return
    /// ----------
    /// * `Ok(Some(record))` for a kept row, `Ok(None)` for a row dropped by the catalog policy,
    ///   or the line-level error that aborts the load.
    fn from_fields(fields: &[&str]) -> Result<Option<Self>, ParseCatalogError>;
}

/// Immutable, keyed snapshot of a catalog.
///
/// Records keep their file order; the key index gives O(1) lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<R> {
    records: Vec<R>,
    index: HashMap<CatalogKey, usize>,
}

impl<R: CatalogRecord> Catalog<R> {
    /// Index already-built records.
    ///
    /// Return
    /// ----------
    /// * The catalog, or [`StarmapError::DuplicateKey`] on the first repeated key.
    pub fn from_records(records: Vec<R>) -> Result<Self, StarmapError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let key = record.key();
            if index.insert(key.clone(), i).is_some() {
                return Err(StarmapError::DuplicateKey(key));
            }
        }
        Ok(Catalog { records, index })
    }

    pub fn get(&self, key: &CatalogKey) -> Option<&R> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn contains_key(&self, key: &CatalogKey) -> bool {
        self.index.contains_key(key)
    }

    /// Records in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = CatalogKey> + '_ {
        self.records.iter().map(CatalogRecord::key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with a known magnitude at or below `limit`.
    ///
    /// Records without a magnitude are never considered bright.
    pub fn brighter_than(&self, limit: Magnitude) -> impl Iterator<Item = &R> + '_ {
        self.records
            .iter()
            .filter(move |r| r.magnitude().is_some_and(|m| m <= limit))
    }

    /// First record whose display label equals `label`.
    pub fn find_by_label(&self, label: &str) -> Option<&R> {
        self.records.iter().find(|r| r.label() == Some(label))
    }

    /// Run every record through a projector and collect the 2D coordinates by key.
    pub fn project<P: Projector + ?Sized>(&self, projector: &P) -> PositionTable {
        let mut positions = PositionTable::with_capacity(self.len());
        for record in &self.records {
            positions.insert(
                record.key(),
                projector.project(record.position(), record.epoch_year()),
            );
        }
        positions
    }
}

impl<R: CatalogFormat> Catalog<R> {
    /// Load a catalog from a seekable stream, plain or gzip-compressed.
    ///
    /// The stream is consumed and dropped before returning.
    ///
    /// Arguments
    /// -----------------
    /// * `stream`: the catalog bytes.
    ///
    /// Return
    /// ----------
    /// * The loaded catalog, or the first error: [`StarmapError::UnsupportedCompression`],
    ///   [`StarmapError::MissingDependency`], [`StarmapError::MalformedRecord`],
    ///   [`StarmapError::DuplicateKey`] or an I/O error.
    pub fn from_reader<S: Read + Seek>(stream: S) -> Result<Self, StarmapError> {
        let content = read_catalog_bytes(stream)?;
        Self::parse_content(&content)
    }

    /// Load a catalog from in-memory bytes, plain or gzip-compressed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StarmapError> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Load a catalog file, plain or gzip-compressed.
    pub fn from_path(path: &Utf8Path) -> Result<Self, StarmapError> {
        let catalog = Self::from_reader(File::open(path)?)?;
        info!(
            "loaded {} records from {} ({path})",
            catalog.len(),
            R::SCHEMA.name
        );
        Ok(catalog)
    }

    fn parse_content(content: &[u8]) -> Result<Self, StarmapError> {
        let schema = R::SCHEMA;
        let columns = ColumnMap::resolve(&schema, R::RETAINED)?;

        let mut records = Vec::new();
        let mut dropped = 0_usize;
        visit_rows(content, &schema, &columns, |line, fields| {
            match R::from_fields(fields).map_err(|e| StarmapError::malformed(schema.name, line, e))? {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
            Ok(())
        })?;

        debug!(
            "{}: kept {} rows, dropped {dropped} by catalog policy",
            schema.name,
            records.len()
        );
        Self::from_records(records)
    }
}

impl<'a, R> IntoIterator for &'a Catalog<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;
    use crate::constants::J2000_EPOCH_YEAR;
    use nalgebra::Point2;

    fn center(name: &str, ra_hours: f64) -> ConstellationCenter {
        ConstellationCenter {
            name: name.to_string(),
            position: SkyPosition::from_hours(ra_hours, 0.0),
            area: 100.0,
            rank: 1,
            epoch_year: J2000_EPOCH_YEAR,
        }
    }

    #[test]
    fn test_from_records_duplicate_key() {
        let err = Catalog::from_records(vec![center("Ori", 5.5), center("Ori", 6.0)]).unwrap_err();
        assert_eq!(err, StarmapError::DuplicateKey(CatalogKey::from("Ori")));
    }

    #[test]
    fn test_lookup_and_order() {
        let catalog =
            Catalog::from_records(vec![center("Ori", 5.5), center("Lyr", 18.8), center("Cyg", 20.6)])
                .unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains_key(&"Lyr".into()));
        assert_eq!(catalog.get(&"Cyg".into()).unwrap().ra_hours(), 20.6);
        assert!(catalog.get(&"And".into()).is_none());
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec![
                CatalogKey::from("Ori"),
                CatalogKey::from("Lyr"),
                CatalogKey::from("Cyg")
            ]
        );
        assert_eq!(catalog.find_by_label("Lyr").unwrap().name, "Lyr");
    }

    #[test]
    fn test_project() {
        let catalog = Catalog::from_records(vec![center("Ori", 1.0), center("Lyr", 2.0)]).unwrap();
        let projector =
            |p: &SkyPosition, _epoch: EpochYear| Point2::new(p.ra_degrees(), p.dec_degrees());
        let positions = catalog.project(&projector);

        assert_eq!(positions.len(), 2);
        assert_eq!(positions.get(&"Lyr".into()), Some(Point2::new(30.0, 0.0)));
    }
}
