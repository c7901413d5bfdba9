//! # Stellarium deep-sky objects
//!
//! Reader for the Stellarium DSO catalog (`catalog.txt`), restricted to **Messier objects**.
//!
//! ## Source layout
//! -----------------
//! Tab-delimited, `#` comments, optionally gzip-compressed, with the fixed column list in
//! [`COLUMN_NAMES`]. Only six columns are retained and renamed:
//!
//! | Source | Field | Unit |
//! |--------|-------|------|
//! | `DSOID` | `dso_id` | catalog id (key) |
//! | `RAdeg` | `position` | degrees, hours derived as `degrees / 15` |
//! | `DEdeg` | `position` | degrees |
//! | `Bmag` | `magnitude_b` | mag, blank → `None` |
//! | `Vmag` | `magnitude` | mag, blank → `None` |
//! | `M` | `messier_id` | Messier number |
//!
//! ## Messier policy
//! -----------------
//! A blank or `0` Messier number means "not a Messier object": the row is dropped. Kept rows
//! get the display label `M<number>` (e.g. `M42`).
use crate::{
    catalogs::{
        reader::{parse_optional_f64, parse_required_f64, parse_required_u32, CatalogSchema, Delimiter},
        CatalogFormat, CatalogRecord,
    },
    constants::{CatalogKey, EpochYear, Magnitude, J2000_EPOCH_YEAR},
    conversion::SkyPosition,
    starmap_errors::ParseCatalogError,
};

/// Column codes of the Stellarium DSO catalog, in file order.
pub const COLUMN_NAMES: &[&str] = &[
    "DSOID", "RAdeg", "DEdeg", "Bmag", "Vmag", "OType", "MType", "MajRarcmin", "MinRarcmin",
    "OAdegrees", "RS", "RSerror", "Plx", "Plxerror", "NRSdist", "NRSdisterror", "NGC", "IC", "M",
    "C", "B", "Sh2", "VdB", "RCW", "LDN", "LBN", "Cr", "Mel", "PGC", "UGC", "Ced", "Arp", "VV",
    "PK", "PN", "SNR", "ACO", "HCG", "ESO", "VdBH", "DWB", "Tr", "St", "Ru", "VdB-Ha",
];

/// A Messier object from the Stellarium DSO catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSkyObject {
    pub dso_id: u32,
    pub position: SkyPosition,
    /// Blue magnitude
    pub magnitude_b: Option<Magnitude>,
    /// Visual magnitude
    pub magnitude: Option<Magnitude>,
    pub messier_id: u32,
    /// `M<messier_id>`
    pub label: String,
    pub epoch_year: EpochYear,
}

impl CatalogRecord for DeepSkyObject {
    fn key(&self) -> CatalogKey {
        CatalogKey::Int(self.dso_id)
    }

    fn position(&self) -> &SkyPosition {
        &self.position
    }

    fn magnitude(&self) -> Option<Magnitude> {
        self.magnitude
    }

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn epoch_year(&self) -> EpochYear {
        self.epoch_year
    }
}

/// Messier number of a row: `None` when blank or `0`.
fn parse_messier_id(value: &str) -> Result<Option<u32>, ParseCatalogError> {
    let invalid = || ParseCatalogError::InvalidNumber {
        column: "M",
        value: value.trim().to_string(),
    };

    match parse_optional_f64("M", value)? {
        None => Ok(None),
        Some(m) if m == 0.0 => Ok(None),
        Some(m) if m > 0.0 && m.fract() == 0.0 && m <= u32::MAX as f64 => Ok(Some(m as u32)),
        Some(_) => Err(invalid()),
    }
}

impl CatalogFormat for DeepSkyObject {
    const SCHEMA: CatalogSchema = CatalogSchema {
        name: "deep-sky objects",
        columns: COLUMN_NAMES,
        delimiter: Delimiter::Tab,
    };

    const RETAINED: &'static [&'static str] = &["DSOID", "RAdeg", "DEdeg", "Bmag", "Vmag", "M"];

    fn from_fields(fields: &[&str]) -> Result<Option<Self>, ParseCatalogError> {
        let Some(messier_id) = parse_messier_id(fields[5])? else {
            return Ok(None);
        };

        let ra_degrees = parse_required_f64("RAdeg", fields[1])?;
        let dec_degrees = parse_required_f64("DEdeg", fields[2])?;

        Ok(Some(DeepSkyObject {
            dso_id: parse_required_u32("DSOID", fields[0])?,
            position: SkyPosition::from_degrees(ra_degrees, dec_degrees),
            magnitude_b: parse_optional_f64("Bmag", fields[3])?,
            magnitude: parse_optional_f64("Vmag", fields[4])?,
            messier_id,
            label: format!("M{messier_id}"),
            epoch_year: J2000_EPOCH_YEAR,
        }))
    }
}

#[cfg(test)]
mod dsos_test {
    use super::*;
    use approx::assert_relative_eq;

    fn fields(m: &'static str) -> [&'static str; 6] {
        ["1234", "83.8221", "-5.3911", "4.00", "", m]
    }

    #[test]
    fn test_messier_label() {
        let dso = DeepSkyObject::from_fields(&fields("42")).unwrap().unwrap();
        assert_eq!(dso.messier_id, 42);
        assert_eq!(dso.label(), Some("M42"));
        assert_eq!(dso.key(), CatalogKey::Int(1234));
        assert_relative_eq!(dso.ra_hours(), 83.8221 / 15.0);
        assert_eq!(dso.magnitude_b, Some(4.0));
        assert_eq!(dso.magnitude, None);
        assert_eq!(dso.epoch_year, 2000.0);
    }

    #[test]
    fn test_non_messier_rows_are_dropped() {
        assert_eq!(DeepSkyObject::from_fields(&fields("0")), Ok(None));
        assert_eq!(DeepSkyObject::from_fields(&fields("")), Ok(None));
        assert_eq!(DeepSkyObject::from_fields(&fields("0.0")), Ok(None));
    }

    #[test]
    fn test_invalid_messier_id() {
        assert_eq!(
            DeepSkyObject::from_fields(&fields("4.5")),
            Err(ParseCatalogError::InvalidNumber {
                column: "M",
                value: "4.5".into()
            })
        );
        assert!(DeepSkyObject::from_fields(&fields("-3")).is_err());
    }

    #[test]
    fn test_column_count() {
        assert_eq!(COLUMN_NAMES.len(), 45);
    }
}
