//! Constellation centers: one label anchor per constellation.
//!
//! Source layout (whitespace-delimited, `#` comments, optionally gzip-compressed):
//!
//! ```text
//! RAhrs  DEdeg  dummy  Area  Rank  Name
//! ```
//!
//! The right ascension is given in **hours**; degrees are derived as `hours × 15`.
//! Records are keyed by `Name` and carry the J2000.0 epoch.
use crate::{
    catalogs::{
        reader::{parse_required_f64, parse_required_u32, CatalogSchema, Delimiter},
        CatalogFormat, CatalogRecord,
    },
    constants::{CatalogKey, EpochYear, J2000_EPOCH_YEAR},
    conversion::SkyPosition,
    starmap_errors::ParseCatalogError,
};

const COLUMN_NAMES: &[&str] = &["RAhrs", "DEdeg", "dummy", "Area", "Rank", "Name"];

/// Center of a constellation, used to place its name on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationCenter {
    /// Constellation name or abbreviation (catalog key)
    pub name: String,
    pub position: SkyPosition,
    /// Sky area in square degrees
    pub area: f64,
    /// Rank of the constellation by area
    pub rank: u32,
    pub epoch_year: EpochYear,
}

impl CatalogRecord for ConstellationCenter {
    fn key(&self) -> CatalogKey {
        CatalogKey::Name(self.name.clone())
    }

    fn position(&self) -> &SkyPosition {
        &self.position
    }

    fn label(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn epoch_year(&self) -> EpochYear {
        self.epoch_year
    }
}

impl CatalogFormat for ConstellationCenter {
    const SCHEMA: CatalogSchema = CatalogSchema {
        name: "constellation centers",
        columns: COLUMN_NAMES,
        delimiter: Delimiter::Whitespace,
    };

    const RETAINED: &'static [&'static str] = &["RAhrs", "DEdeg", "Area", "Rank", "Name"];

    fn from_fields(fields: &[&str]) -> Result<Option<Self>, ParseCatalogError> {
        let ra_hours = parse_required_f64("RAhrs", fields[0])?;
        let dec_degrees = parse_required_f64("DEdeg", fields[1])?;

        Ok(Some(ConstellationCenter {
            name: fields[4].trim().to_string(),
            position: SkyPosition::from_hours(ra_hours, dec_degrees),
            area: parse_required_f64("Area", fields[2])?,
            rank: parse_required_u32("Rank", fields[3])?,
            epoch_year: J2000_EPOCH_YEAR,
        }))
    }
}
