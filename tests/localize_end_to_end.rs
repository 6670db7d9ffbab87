mod common;

use common::{pattern_image, solid};
use mapmatch::{localize, prepare_probe, LocalizeConfig, MapMatchError, ZoneMap};

fn zones(width: usize, height: usize, cfg: &LocalizeConfig) -> Vec<ZoneMap> {
    (1..=3u64)
        .map(|seed| {
            let img = pattern_image(width, height, seed);
            ZoneMap::new(format!("zone-{seed}"), &img, cfg).unwrap()
        })
        .collect()
}

#[test]
fn finds_the_right_zone_and_offset() {
    let cfg = LocalizeConfig::default();
    let zones = zones(120, 100, &cfg);
    let minimap = pattern_image(120, 100, 2).crop(48, 32, 40, 40).unwrap();

    let loc = localize(&minimap, &zones, &cfg).unwrap().unwrap();
    assert_eq!(loc.zone_index, 1);
    assert_eq!(loc.zone, "zone-2");
    assert_eq!((loc.x, loc.y), (48, 32));
    assert_eq!((loc.center_x, loc.center_y), (68, 52));
    // Only ring-edge gradients can differ from the map.
    assert!(loc.avg_diff < 1.0, "avg_diff {}", loc.avg_diff);
    assert_eq!(loc.weighted_diff, Some(0.0));
    assert_eq!(loc.disagreement, Some(0));
    assert_eq!(loc.consistency, 0.0);
    assert!(loc.z_score > 1.0);
    assert!(loc.accepted);

    assert_eq!(loc.zones.len(), 3);
    for (i, zone) in loc.zones.iter().enumerate() {
        assert_eq!(zone.index, i);
        if i != 1 {
            assert!(zone.uniform.score > 20.0);
        }
    }
}

#[test]
fn downscaled_search_reports_full_resolution() {
    let cfg = LocalizeConfig {
        scale: 2,
        void_threshold: 40,
        spotlight_threshold: 40,
        ..LocalizeConfig::default()
    };
    let zones = zones(160, 120, &cfg);
    assert_eq!(zones[0].image().width(), 80);
    let minimap = pattern_image(160, 120, 3).crop(40, 30, 48, 48).unwrap();

    let loc = localize(&minimap, &zones, &cfg).unwrap().unwrap();
    assert_eq!(loc.zone, "zone-3");
    assert_eq!((loc.x, loc.y), (40, 30));
    assert_eq!((loc.center_x, loc.center_y), (64, 54));
    assert!(loc.avg_diff < 2.0, "avg_diff {}", loc.avg_diff);
    assert_eq!((loc.zones[2].uniform.x, loc.zones[2].uniform.y), (40, 30));
}

#[test]
fn dark_minimap_has_no_probe() {
    let cfg = LocalizeConfig {
        void_threshold: 10,
        ..LocalizeConfig::default()
    };
    let zones = zones(120, 100, &cfg);
    let minimap = solid(40, 40, [0, 0, 0]);
    assert_eq!(prepare_probe(&minimap, &cfg).unwrap_err(), MapMatchError::EmptyProbe);
    assert_eq!(
        localize(&minimap, &zones, &cfg).unwrap_err(),
        MapMatchError::EmptyProbe
    );
}

#[test]
fn zones_smaller_than_the_minimap_are_skipped() {
    let cfg = LocalizeConfig::default();
    let tiny = vec![ZoneMap::new("tiny", &pattern_image(30, 30, 1), &cfg).unwrap()];
    let minimap = pattern_image(120, 100, 2).crop(10, 10, 40, 40).unwrap();
    assert!(localize(&minimap, &tiny, &cfg).unwrap().is_none());

    let mut mixed = zones(120, 100, &cfg);
    mixed.insert(0, tiny[0].clone());
    let loc = localize(&minimap, &mixed, &cfg).unwrap().unwrap();
    assert_eq!(loc.zone_index, 2);
    assert_eq!(loc.zones.len(), 3);
    assert_eq!((loc.x, loc.y), (10, 10));
}
