mod common;

use std::fs::File;

use nalgebra::Point2;
use starmap::catalogs::{BoundaryData, Catalog, HipparcosStar};
use starmap::edges::stellarium::{read_constellationship, read_star_names};
use starmap::geometry::{
    assemble_borders, assemble_lines, BorderPolicy, Geometry, LineMode, Segment,
};
use starmap::{CatalogKey, StarmapError};

use common::{assert_point_close, data_path, lyra_projector};

fn stars() -> Catalog<HipparcosStar> {
    Catalog::from_path(&data_path("hip_main_sample.dat")).unwrap()
}

#[test]
fn test_figures_from_stellarium_files() {
    let figures = read_constellationship(File::open(data_path("constellationship.fab")).unwrap())
        .unwrap();
    assert_eq!(figures.len(), 2);
    assert_eq!(figures.edge_count(), 5);

    let names = read_star_names(File::open(data_path("star_names.fab")).unwrap()).unwrap();
    assert_eq!(names.get(&CatalogKey::Int(91262)), Some("Vega"));

    // every star of a figure is in the star catalog
    let stars = stars();
    assert!(figures
        .referenced_keys()
        .into_iter()
        .all(|key| stars.contains_key(key)));
}

#[test]
fn test_constellation_lines() {
    let figures = read_constellationship(File::open(data_path("constellationship.fab")).unwrap())
        .unwrap();
    let positions = stars().project(&lyra_projector);

    let Geometry::Segments(segments) =
        assemble_lines(&figures, &positions, LineMode::Segments).unwrap()
    else {
        panic!("line mode must produce segments");
    };
    assert_eq!(segments.len(), 5);

    // Lyr 91262 → 91919 comes first
    assert_point_close(
        segments[0].start,
        Point2::new((279.23410832 - 281.0) / 100.0, (38.78299311 - 36.0) / 100.0),
        1e-12,
    );
    assert_eq!(segments[0].end, positions.get(&CatalogKey::Int(91919)).unwrap());

    let Geometry::Polygons(polygons) =
        assemble_lines(&figures, &positions, LineMode::Polygon).unwrap()
    else {
        panic!("polygon mode must produce polygons");
    };
    assert_eq!(polygons.len(), 2);
    assert_eq!(polygons[0].group, "Lyr");
    assert_eq!(polygons[0].vertices.len(), 4);
    assert_eq!(polygons[1].vertices.len(), 1);
}

#[test]
fn test_lines_unknown_key() {
    let figures = starmap::edges::stellarium::parse_constellationship("Lyr 1 91262 12345\n").unwrap();
    let positions = stars().project(&lyra_projector);

    assert_eq!(
        assemble_lines(&figures, &positions, LineMode::Segments),
        Err(StarmapError::UnknownKey(CatalogKey::Int(12345)))
    );
}

#[test]
fn test_boundary_borders() {
    let boundaries = BoundaryData::from_path(&data_path("edges_18.txt")).unwrap();
    let positions = boundaries.vertices().project(&lyra_projector);
    let pieces = boundaries.border_segments();

    // the Lyra rectangle chains into one outline, each neighbour keeps its shared edge
    assert_eq!(pieces.len(), 5);
    assert_eq!(pieces[0].id, "LYR:0");
    assert_eq!(pieces[0].vertices.len(), 5);
    assert_eq!(pieces[0].vertices.first(), pieces[0].vertices.last());
    assert!(pieces[1..].iter().all(|p| p.vertices.len() == 2));

    let all = assemble_borders(&pieces, &positions, BorderPolicy::ConsecutivePairs).unwrap();
    let first = assemble_borders(&pieces, &positions, BorderPolicy::FirstPairOnly).unwrap();
    assert_eq!(all.len(), 8);
    assert_eq!(first.len(), 5);

    // the four Lyra borders close a rectangle
    let outline = &all[..4];
    for (current, next) in outline.iter().zip(outline.iter().cycle().skip(1)) {
        assert_eq!(current.end, next.start);
    }
}

#[test]
fn test_border_policy_on_long_piece() {
    let boundaries = BoundaryData::from_path(&data_path("edges_18.txt")).unwrap();
    let positions = boundaries.vertices().project(&lyra_projector);

    let outline = starmap::geometry::BorderSegment {
        id: "LYR".into(),
        vertices: ["001", "002", "003", "004", "001"]
            .into_iter()
            .map(CatalogKey::from)
            .collect(),
    };

    let all = assemble_borders(&[outline.clone()], &positions, BorderPolicy::ConsecutivePairs)
        .unwrap();
    let first = assemble_borders(&[outline], &positions, BorderPolicy::FirstPairOnly).unwrap();

    assert_eq!(all.len(), 4);
    assert_eq!(first.len(), 1);
    assert_eq!(
        first[0],
        Segment::new(
            positions.get(&"001".into()).unwrap(),
            positions.get(&"002".into()).unwrap()
        )
    );
}
