// @file: maanulth_reporting/src/tests/report_verifier.rs
// @description: End-to-end report run against a mock warehouse, checking the files it leaves behind.
// @author: LAS.

#[cfg(test)]
mod report_tests {
    use crate::core::engine::{OutputSettings, ReportEngine};
    use crate::core::models::{Dataset, ReportingPeriod, Value};
    use crate::core::spatial::{OutputCrs, Reprojector};
    use crate::core::transform;
    use crate::exporters::spatial_files;
    use crate::tests::fixtures::{
        first_nation_layer, forest_auth_rows, forest_road_rows, landscape_unit_names, road_landscape_unit_rows,
        table, MockWarehouse,
    };
    use crate::utils::config::AppConfig;
    use serde_json::Value as Json;
    use std::io::Read;
    use std::path::Path;

    fn warehouse() -> MockWarehouse {
        // Markers are matched in order; the road unit query must win over the road query.
        MockWarehouse::new(vec![
            ("ftr.MAP_LABEL IN", road_landscape_unit_rows()),
            ("RMP_LANDSCAPE_UNIT_SVW ldw", landscape_unit_names()),
            ("FTEN_HARVEST_AUTH_POLY_SVW", forest_auth_rows()),
            ("FTEN_ROAD_LINES", forest_road_rows()),
        ])
    }

    fn outputs() -> OutputSettings {
        OutputSettings::from_config(&AppConfig::defaults().unwrap()).unwrap()
    }

    // An xlsx file is a zip of XML parts.
    fn workbook_part(path: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut text = String::new();
        part.read_to_string(&mut text).unwrap();
        text
    }

    #[tokio::test]
    async fn test_report_writes_workbook_and_shapes() {
        // #1. Setup
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("out");
        let warehouse = warehouse();
        let layer = first_nation_layer();
        let period = ReportingPeriod::new(2024).unwrap();

        // #2. Run
        let summary = ReportEngine::new(&warehouse, &layer, outputs())
            .run(&period, &workspace)
            .await
            .unwrap();

        // #3. Row counts only for datasets with rows
        assert_eq!(summary.rows_for(Dataset::ForestAuth), Some(2));
        assert_eq!(summary.rows_for(Dataset::ForestRoad), Some(1));
        assert_eq!(summary.rows_for(Dataset::SpecUse), None);
        assert_eq!(summary.rows_for(Dataset::RecrPoly), None);
        assert_eq!(summary.rows_for(Dataset::RecrLine), None);

        // #4. Files
        let workbook = workspace.join("Maanulth_FRPA_annualReporting_tables_2024.xlsx");
        assert_eq!(summary.workbook.as_deref(), Some(workbook.as_path()));
        assert!(workbook.exists());

        assert_eq!(summary.spatial_files.len(), 2);
        assert!(workspace.join("maanulth_forest_auth_2024_shapes.geojson").exists());
        assert!(workspace.join("maanulth_forest_road_2024_shapes.geojson").exists());
        assert!(!workspace.join("maanulth_spec_use_2024_shapes.geojson").exists());
        assert!(!workspace.join("maanulth_recr_poly_2024_shapes.geojson").exists());
    }

    #[tokio::test]
    async fn test_report_queries_follow_landscape_units() {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = warehouse();
        let layer = first_nation_layer();
        let period = ReportingPeriod::new(2024).unwrap();

        ReportEngine::new(&warehouse, &layer, outputs())
            .run(&period, dir.path())
            .await
            .unwrap();

        let queries = warehouse.recorded();

        // #1. Units first, then five datasets plus the road unit follow-up
        assert_eq!(queries.len(), 7);
        assert!(queries[0].contains("RMP_LANDSCAPE_UNIT_SVW ldw"));
        assert!(queries[1].contains("IN ('Sarita','Nahmint','Central Barkley')"));

        // #2. Road units are asked for the road map labels only
        let road_units = queries.iter().find(|q| q.contains("ftr.MAP_LABEL IN")).unwrap();
        assert!(road_units.contains("IN ('R9 01')"));
    }

    #[tokio::test]
    async fn test_geojson_carries_crs_and_properties() {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = warehouse();
        let layer = first_nation_layer();
        let period = ReportingPeriod::new(2024).unwrap();

        ReportEngine::new(&warehouse, &layer, outputs())
            .run(&period, dir.path())
            .await
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("maanulth_forest_auth_2024_shapes.geojson")).unwrap();
        let doc: Json = serde_json::from_str(&text).unwrap();

        // #1. Collection metadata
        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["name"], "forest_auth");
        assert_eq!(doc["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::3857");

        // #2. One feature per authorization, sorted like the sheet
        let features = doc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        let first = &features[0];
        assert_eq!(first["properties"]["MAP_LABEL"], "A123 1");
        assert_eq!(first["properties"]["ISSUE_DATE"], "2024-03-15 00:00:00");
        assert_eq!(first["properties"]["FN"], "Huu-ay-aht & Toquaht");
        assert_eq!(first["geometry"]["type"], "Polygon");
        assert_eq!(features[1]["properties"]["FN"], Json::Null);
    }

    #[tokio::test]
    async fn test_empty_warehouse_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = MockWarehouse::new(vec![]);
        let layer = first_nation_layer();
        let period = ReportingPeriod::new(2024).unwrap();

        let summary = ReportEngine::new(&warehouse, &layer, outputs())
            .run(&period, dir.path())
            .await
            .unwrap();

        assert!(summary.rows.is_empty());
        assert!(summary.workbook.is_none());
        assert!(summary.spatial_files.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_workbook_replaces_stale_file_with_dataset_sheets() {
        // #1. A leftover file from an earlier run
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Maanulth_FRPA_annualReporting_tables_2024.xlsx");
        std::fs::write(&path, b"stale").unwrap();

        let warehouse = warehouse();
        let layer = first_nation_layer();
        let period = ReportingPeriod::new(2024).unwrap();
        ReportEngine::new(&warehouse, &layer, outputs())
            .run(&period, dir.path())
            .await
            .unwrap();

        // #2. Sheets named by dataset key, in dataset order
        let workbook = workbook_part(&path, "xl/workbook.xml");
        assert_eq!(workbook.matches("<sheet ").count(), 2);
        let auth = workbook.find(r#"name="forest_auth""#).unwrap();
        let road = workbook.find(r#"name="forest_road""#).unwrap();
        assert!(auth < road);

        // #3. Bold header and a date number format
        let styles = workbook_part(&path, "xl/styles.xml");
        assert!(styles.contains("<b/>"));
        assert!(styles.contains("yyyy-mm-dd hh:mm:ss"));

        // #4. ISSUE_DATE (column J) of A123 1 is a styled serial date, not text
        let sheet = workbook_part(&path, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"r="A1" s=""#));
        let cell = &sheet[sheet.find(r#"r="J2""#).unwrap()..];
        let cell = &cell[..cell.find("</c>").unwrap()];
        assert!(cell.contains(" s=\""), "{}", cell);
        assert!(!cell.contains(r#"t="s""#), "{}", cell);
        assert!(cell.contains("<v>45366</v>"), "{}", cell);
    }

    #[test]
    fn test_unparsed_geometry_exports_null_feature_geometry() {
        let raw = table(
            &["MAP_LABEL", "IHA_ID", "LANDSCAPE_UNIT", "SHAPE"],
            vec![vec!["BAD 1".into(), Value::Null, "Sarita".into(), "POLYGON ((broken".into()]],
        );
        let cleaned = transform::clean(Dataset::SpecUse, raw, None, &first_nation_layer());
        let reprojector = Reprojector::new(OutputCrs::Wgs84).unwrap();

        let collection = spatial_files::to_feature_collection(&cleaned, &reprojector).unwrap();

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert!(feature.geometry.is_none());
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties.get("MAP_LABEL"), Some(&Json::from("BAD 1")));

        let doc = serde_json::to_value(&collection).unwrap();
        assert_eq!(doc["features"][0]["geometry"], Json::Null);
    }
}
