// @file: maanulth_reporting/src/connectors/first_nations.rs
// @description: Loads the Maa-nulth First Nation areas layer and answers overlap queries.
// @author: LAS.

use crate::core::errors::{ReportError, ReportResult};
use crate::core::interfaces::AreaLayer;
use geo::Relate;
use geo_types::Geometry;
use log::{debug, info, warn};
use shapefile::dbase::FieldValue;
use std::collections::BTreeSet;
use std::path::Path;


//
// TYPE DEFINITIONS
//

// DE-9IM: interior of the area intersects interior of the authorization.
const INTERIOR_OVERLAP: &str = "T********";

#[derive(Debug, Clone)]
pub struct FirstNationArea {
    pub name: String,
    pub geometry: Geometry<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FirstNationLayer {
    areas: Vec<FirstNationArea>,
}


impl FirstNationLayer {
    pub fn new(areas: Vec<FirstNationArea>) -> Self {
        Self { areas }
    }

    /// Reads a shapefile or GeoJSON layer; `name_field` holds the nation name.
    pub fn load(path: &Path, name_field: &str) -> ReportResult<Self> {
        let lowered = path.to_string_lossy().to_lowercase();

        // #1. Dispatch on format
        let in_geodatabase = path.components()
            .any(|c| c.as_os_str().to_string_lossy().to_lowercase().ends_with(".gdb"));
        let areas = if in_geodatabase {
            return Err(ReportError::Layer(format!(
                "{} is a file geodatabase; export the feature class to a shapefile or GeoJSON",
                path.display()
            )));
        } else if lowered.ends_with(".shp") {
            read_shapefile(path, name_field)?
        } else if lowered.ends_with(".geojson") || lowered.ends_with(".json") {
            read_geojson(path, name_field)?
        } else {
            return Err(ReportError::Layer(format!(
                "Format not recognized for {}. Please provide a shp or geojson file",
                path.display()
            )));
        };

        info!("Loaded {} First Nation areas from {}", areas.len(), path.display());
        Ok(Self { areas })
    }
}

impl AreaLayer for FirstNationLayer {
    // Interiors must meet: sharing an edge is not an overlap.
    fn overlapping(&self, geometry: &Geometry<f64>) -> BTreeSet<String> {
        self.areas.iter()
            .filter(|area| {
                area.geometry.relate(geometry)
                    .matches(INTERIOR_OVERLAP)
                    .unwrap_or(false)
            })
            .map(|area| area.name.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.areas.len()
    }
}


//
// FORMAT READERS
//

fn read_shapefile(path: &Path, name_field: &str) -> ReportResult<Vec<FirstNationArea>> {
    let records = shapefile::read(path).map_err(|e| ReportError::Layer(e.to_string()))?;

    let mut areas = Vec::with_capacity(records.len());
    for (shape, record) in records {
        let name = match record.get(name_field) {
            Some(FieldValue::Character(Some(s))) => s.trim().to_string(),
            Some(FieldValue::Memo(s)) => s.trim().to_string(),
            Some(FieldValue::Numeric(Some(n))) => n.to_string(),
            _ => {
                warn!("Skipping First Nation area without a '{}' value", name_field);
                continue;
            }
        };

        match Geometry::<f64>::try_from(shape) {
            Ok(geometry) => areas.push(FirstNationArea { name, geometry }),
            Err(e) => debug!("Skipping area {} with unsupported shape: {}", name, e),
        }
    }
    Ok(areas)
}

fn read_geojson(path: &Path, name_field: &str) -> ReportResult<Vec<FirstNationArea>> {
    let text = std::fs::read_to_string(path)?;
    let parsed: geojson::GeoJson = text.parse().map_err(|e: geojson::Error| ReportError::Layer(e.to_string()))?;
    let collection = geojson::FeatureCollection::try_from(parsed)
        .map_err(|e| ReportError::Layer(e.to_string()))?;

    let mut areas = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let name = feature.properties.as_ref()
            .and_then(|p| p.get(name_field))
            .and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        let Some(name) = name else {
            warn!("Skipping First Nation area without a '{}' value", name_field);
            continue;
        };
        let Some(geometry) = feature.geometry else { continue };

        let geometry = Geometry::<f64>::try_from(geometry.value)
            .map_err(|e| ReportError::Layer(e.to_string()))?;
        areas.push(FirstNationArea { name, geometry });
    }
    Ok(areas)
}
