mod common;

use std::fs::File;

use hifitime::Epoch;
use starmap::catalogs::{BoundaryData, Catalog, ConstellationCenter, DeepSkyObject, HipparcosStar};
use starmap::chart::{ChartCatalogs, ChartParams, ChartScene, ObserverContext};
use starmap::edges::stellarium::{parse_constellationship, read_constellationship, read_star_names};
use starmap::geometry::{BorderPolicy, Geometry, LineMode};
use starmap::{CatalogKey, StarmapError};

use common::{data_path, lyra_projector};

struct Inputs {
    stars: Catalog<HipparcosStar>,
    dsos: Catalog<DeepSkyObject>,
    centers: Catalog<ConstellationCenter>,
    boundaries: BoundaryData,
}

fn inputs() -> Inputs {
    Inputs {
        stars: Catalog::from_path(&data_path("hip_main_sample.dat")).unwrap(),
        dsos: Catalog::from_path(&data_path("catalog.txt")).unwrap(),
        centers: Catalog::from_path(&data_path("centers_18.txt")).unwrap(),
        boundaries: BoundaryData::from_path(&data_path("edges_18.txt")).unwrap(),
    }
}

fn amsterdam() -> ObserverContext {
    ObserverContext::new(
        "Amsterdam",
        52.377956,
        4.897070,
        28.0,
        Epoch::from_gregorian_utc_hms(1976, 10, 17, 4, 25, 0),
    )
    .unwrap()
    .facing(180.0)
}

#[test]
fn test_full_sky_scene() {
    let inputs = inputs();
    let figures =
        read_constellationship(File::open(data_path("constellationship.fab")).unwrap()).unwrap();
    let names = read_star_names(File::open(data_path("star_names.fab")).unwrap()).unwrap();

    let catalogs = ChartCatalogs {
        stars: &inputs.stars,
        dsos: &inputs.dsos,
        constellations: &figures,
        centers: Some(&inputs.centers),
        boundaries: Some(&inputs.boundaries),
        star_names: Some(&names),
    };

    let scene = ChartScene::assemble(
        &amsterdam(),
        &ChartParams::default(),
        &catalogs,
        &lyra_projector,
    )
    .unwrap();

    assert_eq!(
        scene.title,
        "To the South in Amsterdam on 1976 October 17 04:25 UTC"
    );
    approx::assert_relative_eq!(scene.limit, 1.0, epsilon = 1e-12);
    assert_eq!(scene.telrad_rings.len(), 5);

    assert!(matches!(scene.constellation_lines, Geometry::Segments(ref s) if s.len() == 5));
    assert_eq!(scene.borders.len(), 8);

    // magnitude 6 and 8 limits; missing magnitudes never pass
    assert_eq!(scene.stars.len(), 6);
    assert_eq!(
        scene.dsos.iter().map(|m| m.label.as_deref()).collect::<Vec<_>>(),
        vec![Some("M31"), Some("M101")]
    );

    let vega = scene
        .stars
        .iter()
        .find(|m| m.key == CatalogKey::Int(91262))
        .unwrap();
    approx::assert_relative_eq!(vega.size, (0.7_f64 + 6.0 - 0.03).powi(2), epsilon = 1e-12);

    // only objects inside the field are labelled
    assert_eq!(
        scene.star_labels.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        vec!["Vega"]
    );
    assert_eq!(
        scene.dso_labels.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        vec!["M101"]
    );
    assert_eq!(
        scene.center_labels.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
        vec!["Lyr"]
    );
    approx::assert_relative_eq!(scene.star_labels[0].position.x, vega.position.x + 0.004, epsilon = 1e-12);
}

#[test]
fn test_scene_options() {
    let inputs = inputs();
    let figures =
        read_constellationship(File::open(data_path("constellationship.fab")).unwrap()).unwrap();

    let catalogs = ChartCatalogs {
        stars: &inputs.stars,
        dsos: &inputs.dsos,
        constellations: &figures,
        centers: None,
        boundaries: None,
        star_names: None,
    };

    let params = ChartParams::builder()
        .field_of_view_degrees(18.0)
        .limiting_magnitude(4.0)
        .line_mode(LineMode::Polygon)
        .border_policy(BorderPolicy::FirstPairOnly)
        .build()
        .unwrap();

    let scene = ChartScene::assemble(&amsterdam(), &params, &catalogs, &lyra_projector).unwrap();

    assert!(scene.limit < 1.0);
    assert!(matches!(scene.constellation_lines, Geometry::Polygons(ref p) if p.len() == 2));
    assert!(scene.borders.is_empty());
    assert!(scene.center_labels.is_empty());
    assert!(scene.star_labels.is_empty());
    // 0.03, 0.18, 0.45, 3.52, 3.25
    assert_eq!(scene.stars.len(), 5);
}

#[test]
fn test_scene_border_policy() {
    let inputs = inputs();
    let figures = parse_constellationship("Lyr 1 91262 91919\n").unwrap();

    let catalogs = ChartCatalogs {
        stars: &inputs.stars,
        dsos: &inputs.dsos,
        constellations: &figures,
        centers: None,
        boundaries: Some(&inputs.boundaries),
        star_names: None,
    };

    let border_count = |policy: BorderPolicy| {
        let params = ChartParams::builder().border_policy(policy).build().unwrap();
        ChartScene::assemble(&amsterdam(), &params, &catalogs, &lyra_projector)
            .unwrap()
            .borders
            .len()
    };

    // Lyra outline of 4 sides plus one shared side per neighbour
    assert_eq!(border_count(BorderPolicy::ConsecutivePairs), 8);
    assert_eq!(border_count(BorderPolicy::FirstPairOnly), 5);
}

#[test]
fn test_scene_unknown_key() {
    let inputs = inputs();
    let figures = parse_constellationship("Lyr 1 91262 70000\n").unwrap();

    let catalogs = ChartCatalogs {
        stars: &inputs.stars,
        dsos: &inputs.dsos,
        constellations: &figures,
        centers: None,
        boundaries: None,
        star_names: None,
    };

    let err = ChartScene::assemble(
        &amsterdam(),
        &ChartParams::default(),
        &catalogs,
        &lyra_projector,
    )
    .unwrap_err();
    assert_eq!(err, StarmapError::UnknownKey(CatalogKey::Int(70000)));
}
