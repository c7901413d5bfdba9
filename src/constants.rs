//! # Constants and type definitions for starmap
//!
//! This module centralizes the **reference epochs**, **unit conversion factors**, **file magic
//! numbers** and **common type definitions** shared by the catalog loaders, the edge geometry
//! assembler and the chart helpers.
//!
//! ## Overview
//!
//! - Reference epochs attached to each catalog kind at load time
//! - Unit conversions (hours ↔ degrees)
//! - Compression magic numbers used by the loader sniffing step
//! - Core type aliases and the [`CatalogKey`] identifier

// -------------------------------------------------------------------------------------------------
// Reference epochs
// -------------------------------------------------------------------------------------------------

/// Reference epoch of the Stellarium deep-sky and constellation-center catalogs (J2000.0)
pub const J2000_EPOCH_YEAR: f64 = 2000.0;

/// Reference epoch of the Hipparcos astrometry (J1991.25)
pub const HIPPARCOS_EPOCH_YEAR: f64 = 1991.25;

/// Reference epoch of the IAU constellation boundaries (B1875.0)
pub const B1875_EPOCH_YEAR: f64 = 1875.0;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Hours of right ascension → degrees
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// Tolerance used when two catalog rows describe the same boundary vertex
pub const VERTEX_TOLERANCE_DEG: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Compression sniffing
// -------------------------------------------------------------------------------------------------

/// Leading bytes of a gzip member (RFC 1952)
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// First two bytes of a UTF-8 byte order mark
pub const UTF8_BOM_PREFIX: [u8; 2] = [0xef, 0xbb];

/// Number of bytes inspected to decide on the compression of a catalog stream
pub const SNIFF_LEN: usize = 2;

/// Comment marker shared by every catalog format
pub const COMMENT_MARKER: u8 = b'#';

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Right ascension in hours
pub type Hour = f64;
/// Apparent magnitude (lower is brighter)
pub type Magnitude = f64;
/// Decimal year of a reference epoch
pub type EpochYear = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// Identifier of a catalog entry.
///
/// This can be:
/// - A numeric catalog id (e.g. Hipparcos `Int(32349)`, Stellarium DSO id)
/// - A name or code (e.g. a constellation name, a boundary vertex key like `"A01"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogKey {
    /// Integer-based catalog id
    Int(u32),
    /// String-based name or code
    Name(String),
}

impl std::fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKey::Int(n) => write!(f, "{n}"),
            CatalogKey::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for CatalogKey {
    fn from(n: u32) -> Self {
        CatalogKey::Int(n)
    }
}

impl From<String> for CatalogKey {
    fn from(s: String) -> Self {
        CatalogKey::Name(s)
    }
}

impl From<&str> for CatalogKey {
    fn from(s: &str) -> Self {
        CatalogKey::Name(s.to_string())
    }
}
