//! Types and helpers for the Hipparcos main catalog (`hip_main.dat`, ESA 1997).
//!
//! The file is `|`-delimited with 78 fields per row. Seven are retained: `HIP`, `Vmag`,
//! `RAdeg`, `DEdeg`, `Plx`, `pmRA`, `pmDE`. Positions are ICRS at epoch J1991.25.
//!
//! A few hundred Hipparcos entries have no astrometric solution (blank `RAdeg`/`DEdeg`).
//! They cannot be placed on a chart, so the loader drops them instead of failing.
use crate::{
    catalogs::{
        reader::{parse_optional_f64, parse_required_u32, CatalogSchema, Delimiter},
        CatalogFormat, CatalogRecord,
    },
    constants::{CatalogKey, EpochYear, Magnitude, HIPPARCOS_EPOCH_YEAR},
    conversion::SkyPosition,
    starmap_errors::ParseCatalogError,
};

/// Field codes H0..H77 of `hip_main.dat`.
pub const COLUMN_NAMES: &[&str] = &[
    "Catalog", "HIP", "Proxy", "RAhms", "DEdms", "Vmag", "VarFlag", "r_Vmag", "RAdeg", "DEdeg",
    "AstroRef", "Plx", "pmRA", "pmDE", "e_RAdeg", "e_DEdeg", "e_Plx", "e_pmRA", "e_pmDE", "DE:RA",
    "Plx:RA", "Plx:DE", "pmRA:RA", "pmRA:DE", "pmRA:Plx", "pmDE:RA", "pmDE:DE", "pmDE:Plx",
    "pmDE:pmRA", "F1", "F2", "---", "BTmag", "e_BTmag", "VTmag", "e_VTmag", "m_BTmag", "B-V",
    "e_B-V", "r_B-V", "V-I", "e_V-I", "r_V-I", "CombMag", "Hpmag", "e_Hpmag", "Hpscat", "o_Hpmag",
    "m_Hpmag", "Hpmax", "HPmin", "Period", "HvarType", "moreVar", "morePhoto", "CCDM", "n_CCDM",
    "Nsys", "Ncomp", "MultFlag", "Source", "Qual", "m_HIP", "theta", "rho", "e_rho", "dHp",
    "e_dHp", "Survey", "Chart", "Notes", "HD", "BD", "CoD", "CPD", "(V-I)red", "SpType",
    "r_SpType",
];

/// A star from the Hipparcos main catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct HipparcosStar {
    pub hip: u32,
    pub position: SkyPosition,
    /// Johnson V magnitude
    pub magnitude: Option<Magnitude>,
    pub parallax_mas: Option<f64>,
    pub ra_mas_per_year: Option<f64>,
    pub dec_mas_per_year: Option<f64>,
    pub epoch_year: EpochYear,
}

impl CatalogRecord for HipparcosStar {
    fn key(&self) -> CatalogKey {
        CatalogKey::Int(self.hip)
    }

    fn position(&self) -> &SkyPosition {
        &self.position
    }

    fn magnitude(&self) -> Option<Magnitude> {
        self.magnitude
    }

    fn epoch_year(&self) -> EpochYear {
        self.epoch_year
    }
}

impl CatalogFormat for HipparcosStar {
    const SCHEMA: CatalogSchema = CatalogSchema {
        name: "hipparcos",
        columns: COLUMN_NAMES,
        delimiter: Delimiter::Pipe,
    };

    const RETAINED: &'static [&'static str] =
        &["HIP", "Vmag", "RAdeg", "DEdeg", "Plx", "pmRA", "pmDE"];

    fn from_fields(fields: &[&str]) -> Result<Option<Self>, ParseCatalogError> {
        let hip = parse_required_u32("HIP", fields[0])?;

        let ra = parse_optional_f64("RAdeg", fields[2])?;
        let dec = parse_optional_f64("DEdeg", fields[3])?;
        let (Some(ra_degrees), Some(dec_degrees)) = (ra, dec) else {
            return Ok(None);
        };

        Ok(Some(HipparcosStar {
            hip,
            position: SkyPosition::from_degrees(ra_degrees, dec_degrees),
            magnitude: parse_optional_f64("Vmag", fields[1])?,
            parallax_mas: parse_optional_f64("Plx", fields[4])?,
            ra_mas_per_year: parse_optional_f64("pmRA", fields[5])?,
            dec_mas_per_year: parse_optional_f64("pmDE", fields[6])?,
            epoch_year: HIPPARCOS_EPOCH_YEAR,
        }))
    }
}

#[cfg(test)]
mod hipparcos_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_column_count() {
        assert_eq!(COLUMN_NAMES.len(), 78);
        assert_eq!(COLUMN_NAMES[8], "RAdeg");
        assert_eq!(COLUMN_NAMES[13], "pmDE");
    }

    #[test]
    fn test_parse_star() {
        let star = HipparcosStar::from_fields(&[
            " 32349",
            "-1.44",
            "101.28854105",
            "-16.71314306",
            "  379.21",
            " -546.01",
            "-1223.08",
        ])
        .unwrap()
        .unwrap();

        assert_eq!(star.key(), CatalogKey::Int(32349));
        assert_eq!(star.magnitude(), Some(-1.44));
        assert_relative_eq!(star.ra_hours(), 101.28854105 / 15.0);
        assert_eq!(star.parallax_mas, Some(379.21));
        assert_eq!(star.epoch_year(), 1991.25);
    }

    #[test]
    fn test_star_without_position_is_dropped() {
        let star = HipparcosStar::from_fields(&["   263", "11.00", "  ", "  ", "", "", ""]);
        assert_eq!(star, Ok(None));
    }
}
