// @file: maanulth_reporting/src/tests/layer_verifier.rs
// @description: First Nation layer loading and overlap rules.
// @author: LAS.

#[cfg(test)]
mod layer_tests {
    use crate::connectors::first_nations::FirstNationLayer;
    use crate::core::errors::ReportError;
    use crate::core::interfaces::AreaLayer;
    use crate::core::spatial;
    use crate::tests::fixtures::{first_nation_layer, square_wkt};
    use std::path::Path;

    const LAYER_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "FN_area_r": "Ucluelet " },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "OTHER": "no name" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [5, 0], [5, 5], [0, 5], [0, 0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_geojson_layer_loads_named_areas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areas.geojson");
        std::fs::write(&path, LAYER_GEOJSON).unwrap();

        let layer = FirstNationLayer::load(&path, "FN_area_r").unwrap();

        // #1. Unnamed features are skipped
        assert_eq!(layer.len(), 1);

        // #2. Names are trimmed
        let block = spatial::parse_wkt("T", &square_wkt(2.0, 2.0, 2.0)).unwrap();
        let hits: Vec<String> = layer.overlapping(&block).into_iter().collect();
        assert_eq!(hits, vec!["Ucluelet".to_string()]);
    }

    #[test]
    fn test_geodatabase_is_rejected() {
        match FirstNationLayer::load(Path::new("data/FN.gdb/areas"), "FN_area_r") {
            Err(ReportError::Layer(message)) => assert!(message.contains("geodatabase")),
            other => panic!("expected a layer error, got {:?}", other.map(|l| l.len())),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        match FirstNationLayer::load(Path::new("areas.kml"), "FN_area_r") {
            Err(ReportError::Layer(message)) => assert!(message.contains("Format not recognized")),
            other => panic!("expected a layer error, got {:?}", other.map(|l| l.len())),
        }
    }

    #[test]
    fn test_shared_edge_is_not_an_overlap() {
        let layer = first_nation_layer();
        // Sits entirely inside Uchucklesaht, well clear of the other two.
        let inside = spatial::parse_wkt("U", &square_wkt(1_001_500.0, 500_100.0, 100.0)).unwrap();
        // Touches Uchucklesaht only along x = 1001000.
        let touching = spatial::parse_wkt("E", &square_wkt(1_000_900.0, 500_100.0, 100.0)).unwrap();

        assert_eq!(layer.overlapping(&inside).into_iter().collect::<Vec<_>>(), vec!["Uchucklesaht".to_string()]);
        assert!(layer.overlapping(&touching).is_empty());
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_gdb_lookalike_directory_is_not_a_geodatabase() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("areas.gdbackup");
        std::fs::create_dir(&folder).unwrap();
        let path = folder.join("areas.geojson");
        std::fs::write(&path, LAYER_GEOJSON).unwrap();

        let layer = FirstNationLayer::load(&path, "FN_area_r").unwrap();
        assert_eq!(layer.len(), 1);
    }
}
