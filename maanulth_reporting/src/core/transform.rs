// @file: maanulth_reporting/src/core/transform.rs
// @description: Turns raw warehouse rows into the annual reporting template layout.
// @author: LAS.

use crate::core::interfaces::AreaLayer;
use crate::core::models::{
    Dataset, Table, Value, FIRST_NATION, IHA_ID, LANDSCAPE_UNIT, MAP_LABEL, SHAPE, TENURE_LENGTH_YRS,
};
use crate::core::spatial;
use geo_types::Geometry;
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet};


//
// CONSTANTS
//

pub const AGENCY: &str = "FOR";
pub const LEGISLATION: &str = "Forest Act and FRPA";
pub const ENGAGEMENT_PROMPT: &str = "Enter Yes or No";
pub const NOT_APPLICABLE: &str = "N/A";

const IHA_SEPARATOR: &str = "; ";
const LANDSCAPE_UNIT_SEPARATOR: &str = "; ";
const ROAD_LANDSCAPE_UNIT_SEPARATOR: &str = ", ";
const FIRST_NATION_SEPARATOR: &str = " & ";


//
// OUTPUT
//

/// A dataset in template layout, plus one geometry per map label.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub dataset: Dataset,
    pub table: Table,
    pub geometries: HashMap<String, Geometry<f64>>,
}


//
// PIPELINE
//

pub fn clean(
    dataset: Dataset,
    mut table: Table,
    road_landscape_units: Option<&Table>,
    layer: &dyn AreaLayer,
) -> CleanedDataset {
    for column in [dataset.measure_column(), dataset.description_column(), dataset.date_column()] {
        if !table.has_column(column) {
            warn!("{}: query returned no {} column", dataset, column);
        }
    }

    // #1. Geometry leaves the tabular view
    let geometries = split_geometry(&mut table);

    // #2. One IHA list per authorization
    let iha = collapse_iha(&table);
    table.merge_by_key(MAP_LABEL, IHA_ID, &iha);

    // #3. Landscape units
    if table.has_column(LANDSCAPE_UNIT) {
        let units = collapse_sorted(&table, LANDSCAPE_UNIT, LANDSCAPE_UNIT_SEPARATOR);
        table.merge_by_key(MAP_LABEL, LANDSCAPE_UNIT, &units);
        table.dedup_by(&[MAP_LABEL]);
    } else {
        let units = road_landscape_units
            .map(|lu| collapse_in_order(lu, LANDSCAPE_UNIT, ROAD_LANDSCAPE_UNIT_SEPARATOR))
            .unwrap_or_default();
        table.merge_by_key(MAP_LABEL, LANDSCAPE_UNIT, &units);
    }

    // #4. First Nation overlaps
    let nations = first_nation_overlaps(&geometries, layer);
    table.merge_by_key(MAP_LABEL, FIRST_NATION, &nations);

    // #5. Template columns
    apply_template_columns(dataset, &mut table);
    normalize_tenure(&mut table);

    // #6. Final layout; roads dedupe on what the sheet shows
    let mut table = table.project(dataset.layout());
    if !dataset.joins_landscape_units() {
        table.dedup_rows();
    }
    table.sort_by(MAP_LABEL);

    debug!("{}: {} rows after cleanup, {} geometries", dataset, table.len(), geometries.len());
    CleanedDataset { dataset, table, geometries }
}


//
// STEPS
//

/// Removes `SHAPE`, keeping the first parsable geometry for each map label.
pub fn split_geometry(table: &mut Table) -> HashMap<String, Geometry<f64>> {
    let labels: Vec<Option<String>> = table.column_values(MAP_LABEL).into_iter().map(Value::as_text).collect();
    let Some(shapes) = table.drop_column(SHAPE) else {
        return HashMap::new();
    };

    let mut geometries: HashMap<String, Geometry<f64>> = HashMap::new();
    for (label, shape) in labels.into_iter().zip(shapes) {
        let (Some(label), Value::Text(wkt)) = (label, shape) else { continue };
        if geometries.contains_key(&label) {
            continue;
        }
        match spatial::parse_wkt(&label, &wkt) {
            Ok(geometry) => {
                geometries.insert(label, geometry);
            }
            Err(e) => warn!("{}", e),
        }
    }
    geometries
}

/// IHA ids per map label as a sorted, unique `; ` list. Non-numeric ids are ignored.
pub fn collapse_iha(table: &Table) -> HashMap<String, Value> {
    let mut grouped: HashMap<String, BTreeSet<i64>> = HashMap::new();
    for (label, iha) in table.column_values(MAP_LABEL).into_iter().zip(table.column_values(IHA_ID)) {
        let Some(label) = label.as_text() else { continue };
        let entry = grouped.entry(label).or_default();
        if let Some(id) = iha.as_i64().filter(|id| *id != 0) {
            entry.insert(id);
        }
    }

    grouped.into_iter()
        .map(|(label, ids)| {
            let joined = if ids.is_empty() {
                Value::Null
            } else {
                Value::Text(ids.iter().map(i64::to_string).collect::<Vec<String>>().join(IHA_SEPARATOR))
            };
            (label, joined)
        })
        .collect()
}

/// Sorted unique text of `column` per map label.
pub fn collapse_sorted(table: &Table, column: &str, separator: &str) -> HashMap<String, Value> {
    let mut grouped: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (label, value) in table.column_values(MAP_LABEL).into_iter().zip(table.column_values(column)) {
        let Some(label) = label.as_text() else { continue };
        let entry = grouped.entry(label).or_default();
        if let Some(text) = value.as_text() {
            entry.insert(text);
        }
    }
    join_groups(grouped.into_iter().map(|(k, v)| (k, v.into_iter().collect())), separator)
}

/// Unique text of `column` per map label, in first-seen order.
pub fn collapse_in_order(table: &Table, column: &str, separator: &str) -> HashMap<String, Value> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (label, value) in table.column_values(MAP_LABEL).into_iter().zip(table.column_values(column)) {
        let Some(label) = label.as_text() else { continue };
        let entry = grouped.entry(label).or_default();
        if let Some(text) = value.as_text() {
            if !entry.contains(&text) {
                entry.push(text);
            }
        }
    }
    join_groups(grouped.into_iter(), separator)
}

fn join_groups(
    groups: impl Iterator<Item = (String, Vec<String>)>,
    separator: &str,
) -> HashMap<String, Value> {
    groups
        .map(|(label, items)| {
            let value = if items.is_empty() { Value::Null } else { Value::Text(items.join(separator)) };
            (label, value)
        })
        .collect()
}

pub fn first_nation_overlaps(
    geometries: &HashMap<String, Geometry<f64>>,
    layer: &dyn AreaLayer,
) -> HashMap<String, Value> {
    geometries.iter()
        .filter_map(|(label, geometry)| {
            let names = layer.overlapping(geometry);
            if names.is_empty() {
                return None;
            }
            let joined = names.into_iter().collect::<Vec<String>>().join(FIRST_NATION_SEPARATOR);
            Some((label.clone(), Value::Text(joined)))
        })
        .collect()
}

pub fn apply_template_columns(dataset: Dataset, table: &mut Table) {
    table.set_constant("AGENCY", Value::text(AGENCY));
    table.set_constant("LEGISLATION", Value::text(LEGISLATION));
    table.set_constant("SPATIAL", Value::text("Yes"));
    table.set_constant("LAT_LONG", Value::Null);
    table.set_constant("DID_ENGAGE_OCCUR", Value::text(ENGAGEMENT_PROMPT));
    table.set_constant("IF_NO_ENGAGE", Value::Null);
    // Filled in by hand on the template.
    table.set_constant("AMEND_DATE", Value::Null);

    if dataset.is_recreation() {
        table.set_constant("FILE_TYPE_CODE", Value::Null);
    }

    let iha_present: Vec<bool> = table.column_values(IHA_ID).iter().map(|v| !v.is_null()).collect();
    let mut flags = iha_present.into_iter();
    table.map_column("IS_IHA", |_| {
        Value::text(if flags.next().unwrap_or(false) { "YES" } else { "NO" })
    });
}

/// Zero-year tenures count as one year; unknown lengths read `N/A`.
pub fn normalize_tenure(table: &mut Table) {
    table.map_column(TENURE_LENGTH_YRS, |value| match value.as_i64() {
        Some(0) => Value::text("1"),
        Some(years) => Value::Text(years.to_string()),
        None => Value::text(NOT_APPLICABLE),
    });
}

/// Distinct map labels in first-seen order.
pub fn map_labels(table: &Table) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    table.column_values(MAP_LABEL).into_iter()
        .filter_map(Value::as_text)
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
