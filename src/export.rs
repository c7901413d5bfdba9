//! JSON-lines export of the Messier catalog.
//!
//! One object per line:
//!
//! ```text
//! {"Name":"M42","Constellation":"Orion (Ori)","Magnitude":4.0,"Right Ascention":83.82,"Declination":-5.39}
//! ```
//!
//! The constellation containing each object comes from a caller-supplied
//! [`ConstellationLookup`] (a boundary map lookup); this crate does not ship one.
use std::{
    fs::File,
    io::{BufWriter, Write},
};

use camino::Utf8Path;
use log::info;
use serde::Serialize;

use crate::{
    catalogs::{Catalog, CatalogRecord, DeepSkyObject},
    constants::{Degree, Magnitude},
    conversion::SkyPosition,
    starmap_errors::StarmapError,
};

/// A constellation identified by a boundary lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstellationName {
    pub abbreviation: String,
    pub name: String,
}

impl std::fmt::Display for ConstellationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.abbreviation)
    }
}

/// Maps a sky position to the constellation containing it.
pub trait ConstellationLookup {
    fn constellation(&self, position: &SkyPosition) -> Option<ConstellationName>;
}

impl<F> ConstellationLookup for F
where
    F: Fn(&SkyPosition) -> Option<ConstellationName>,
{
    fn constellation(&self, position: &SkyPosition) -> Option<ConstellationName> {
        self(position)
    }
}

/// One exported line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessierEntry {
    #[serde(rename = "Name")]
    pub name: String,
    /// `"<full name> (<abbr>)"`, `null` when the lookup has no answer
    #[serde(rename = "Constellation")]
    pub constellation: Option<String>,
    #[serde(rename = "Magnitude")]
    pub magnitude: Option<Magnitude>,
    // key spelling kept as in existing messier_data.json files
    #[serde(rename = "Right Ascention")]
    pub ra_degrees: Degree,
    #[serde(rename = "Declination")]
    pub dec_degrees: Degree,
}

impl MessierEntry {
    pub fn new<L: ConstellationLookup + ?Sized>(dso: &DeepSkyObject, lookup: &L) -> Self {
        MessierEntry {
            name: dso.label.clone(),
            constellation: lookup
                .constellation(dso.position())
                .map(|c| c.to_string()),
            magnitude: dso.magnitude(),
            ra_degrees: dso.ra_degrees(),
            dec_degrees: dso.dec_degrees(),
        }
    }
}

/// Write every Messier object as one JSON object per line, in catalog order.
///
/// Arguments
/// -----------------
/// * `catalog`: the Messier catalog.
/// * `lookup`: constellation boundary lookup.
/// * `writer`: destination; it is flushed before returning.
///
/// Return
/// ----------
/// * The number of lines written.
pub fn export_messier_json<L, W>(
    catalog: &Catalog<DeepSkyObject>,
    lookup: &L,
    mut writer: W,
) -> Result<usize, StarmapError>
where
    L: ConstellationLookup + ?Sized,
    W: Write,
{
    for dso in catalog {
        serde_json::to_writer(&mut writer, &MessierEntry::new(dso, lookup))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(catalog.len())
}

/// [`export_messier_json`] into a new file at `path`.
pub fn export_messier_json_file<L: ConstellationLookup + ?Sized>(
    catalog: &Catalog<DeepSkyObject>,
    lookup: &L,
    path: &Utf8Path,
) -> Result<usize, StarmapError> {
    let written = export_messier_json(catalog, lookup, BufWriter::new(File::create(path)?))?;
    info!("exported {written} Messier objects to {path}");
    Ok(written)
}
