// @file: maanulth_reporting/src/exporters/spatial_files.rs
// @description: Writes a cleaned dataset to a GeoJSON FeatureCollection in the output CRS.
// @author: LAS.

use crate::core::errors::ReportResult;
use crate::core::models::{Value, MAP_LABEL};
use crate::core::spatial::Reprojector;
use crate::core::transform::CleanedDataset;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn geojson_path(workspace: &Path, prefix: &str, key: &str, year: i32) -> PathBuf {
    workspace.join(format!("{}_{}_{}_shapes.geojson", prefix, key, year))
}

/// Builds one feature per map label, first row wins.
pub fn to_feature_collection(cleaned: &CleanedDataset, reprojector: &Reprojector) -> ReportResult<FeatureCollection> {
    let table = &cleaned.table;
    let label_idx = table.column_index(MAP_LABEL);
    let mut seen: HashSet<String> = HashSet::new();
    let mut features = Vec::with_capacity(table.len());

    for row in table.rows() {
        let label = label_idx.and_then(|i| row[i].as_text());
        if let Some(label) = &label {
            if !seen.insert(label.clone()) {
                continue;
            }
        }

        // #1. Properties mirror the sheet columns
        let mut properties = JsonObject::new();
        for (name, value) in table.columns().iter().zip(row) {
            properties.insert(name.clone(), to_json(value));
        }

        // #2. Geometry in the output CRS
        let geometry = match label.as_ref().and_then(|l| cleaned.geometries.get(l)) {
            Some(geometry) => Some(Geometry::new(GeoJsonValue::from(&reprojector.project(geometry)?))),
            None => {
                warn!("{}: no geometry for {}", cleaned.dataset, label.as_deref().unwrap_or("<unlabelled>"));
                None
            }
        };

        features.push(Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    let mut crs = JsonObject::new();
    crs.insert("type".to_string(), JsonValue::from("name"));
    crs.insert("properties".to_string(), serde_json::json!({ "name": reprojector.target().urn() }));
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("name".to_string(), JsonValue::from(cleaned.dataset.key()));
    foreign_members.insert("crs".to_string(), JsonValue::Object(crs));

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
}

pub fn write_geojson(path: &Path, cleaned: &CleanedDataset, reprojector: &Reprojector) -> ReportResult<()> {
    let collection = to_feature_collection(cleaned, reprojector)?;
    let count = collection.features.len();
    std::fs::write(path, serde_json::to_string(&collection)?)?;
    info!("Wrote {} feature(s) to {}", count, path.display());
    Ok(())
}

// Dates become plain strings.
fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Text(s) => JsonValue::from(s.as_str()),
        Value::Integer(i) => JsonValue::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number).unwrap_or(JsonValue::Null),
        Value::DateTime(_) => JsonValue::from(value.to_string()),
    }
}
