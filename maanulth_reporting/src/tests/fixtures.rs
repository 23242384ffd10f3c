// @file: maanulth_reporting/src/tests/fixtures.rs
// @description: Shared test doubles: canned warehouse tables and an in-memory First Nation layer.
// @author: LAS.

use crate::connectors::first_nations::{FirstNationArea, FirstNationLayer};
use crate::core::errors::ReportResult;
use crate::core::interfaces::Warehouse;
use crate::core::models::{Table, Value};
use crate::core::spatial;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Mutex;

//
// TABLE BUILDERS
//

pub fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    let mut t = Table::new(columns.iter().copied());
    for row in rows {
        t.push_row(row).expect("fixture row width");
    }
    t
}

pub fn date(y: i32, m: u32, d: u32) -> Value {
    Value::DateTime(datetime(y, m, d))
}

pub fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

// Axis-aligned square in BC Albers metres.
pub fn square_wkt(x: f64, y: f64, size: f64) -> String {
    format!(
        "POLYGON (({x} {y}, {x2} {y}, {x2} {y2}, {x} {y2}, {x} {y}))",
        x = x,
        y = y,
        x2 = x + size,
        y2 = y + size
    )
}


//
// FIRST NATION LAYER
//

// Huu-ay-aht and Toquaht overlap the test block at (1000000, 500000); Uchucklesaht only shares its east edge.
pub fn first_nation_layer() -> FirstNationLayer {
    let area = |name: &str, wkt: String| FirstNationArea {
        name: name.to_string(),
        geometry: spatial::parse_wkt(name, &wkt).unwrap(),
    };
    FirstNationLayer::new(vec![
        area("Huu-ay-aht", square_wkt(999_000.0, 499_000.0, 1_500.0)),
        area("Uchucklesaht", square_wkt(1_001_000.0, 500_000.0, 1_000.0)),
        area("Toquaht", square_wkt(999_800.0, 500_200.0, 500.0)),
    ])
}


//
// MOCK WAREHOUSE
//

/// Answers each query with the first table whose marker appears in the SQL.
pub struct MockWarehouse {
    responses: Vec<(&'static str, Table)>,
    pub queries: Mutex<Vec<String>>,
}

impl MockWarehouse {
    pub fn new(responses: Vec<(&'static str, Table)>) -> Self {
        Self { responses, queries: Mutex::new(Vec::new()) }
    }

    pub fn recorded(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Warehouse for MockWarehouse {
    async fn fetch(&self, sql: &str) -> ReportResult<Table> {
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self.responses.iter()
            .find(|(marker, _)| sql.contains(marker))
            .map(|(_, t)| t.clone())
            .unwrap_or_default())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}


//
// CANNED DATASETS
//

pub const FOREST_AUTH_COLUMNS: &[&str] = &[
    "MAP_LABEL", "FILE_TYPE_DESCRIPTION", "FILE_STATUS_CODE", "FILE_TYPE_CODE", "ISSUE_DATE",
    "AMEND_DATE", "IHA_ID", "NEW_AMEND", "TENURE_LENGTH_YRS", "AREA_HA", "REGION", "LANDSCAPE_UNIT", "SHAPE",
];

// A123 1 repeats once per IHA x landscape unit join; B200 2 sits far from every nation.
pub fn forest_auth_rows() -> Table {
    let a = square_wkt(1_000_000.0, 500_000.0, 1_000.0);
    let b = square_wkt(1_200_000.0, 600_000.0, 1_000.0);
    let row = |label: &str, iha: Value, lu: &str, tenure: Value, shape: &str| -> Vec<Value> {
        vec![
            label.into(), "Cutting Permit".into(), "HI".into(), "B07".into(), date(2024, 3, 15),
            date(2024, 4, 1), iha, "New".into(), tenure, Value::Float(12.5), "South".into(),
            lu.into(), shape.into(),
        ]
    };
    table(FOREST_AUTH_COLUMNS, vec![
        row("B200 2", Value::Null, "Sarita", Value::Null, b.as_str()),
        row("A123 1", Value::Integer(101), "Sarita", Value::Integer(0), a.as_str()),
        row("A123 1", Value::Float(102.0), "Nahmint", Value::Integer(0), a.as_str()),
        row("A123 1", Value::Integer(101), "Nahmint", Value::Integer(0), a.as_str()),
    ])
}

pub const FOREST_ROAD_COLUMNS: &[&str] = &[
    "MAP_LABEL", "ROAD_SECTION_LENGTH_KM", "FILE_TYPE_CODE", "FILE_TYPE_DESCRIPTION", "FILE_STATUS_CODE",
    "FILE_AMEND_SECTION", "ENTRY_TIMESTAMP", "IHA_ID", "TENURE_LENGTH_YRS", "NEW_AMEND", "REGION", "SHAPE",
];

pub fn forest_road_rows() -> Table {
    let line = "LINESTRING (999500 500500, 1000500 500500)";
    let row = |iha: Value| -> Vec<Value> {
        vec![
            "R9 01".into(), Value::Float(1.2), "RP".into(), "Road Permit".into(), "HI".into(),
            "R9 01, Amendment 3, Road Associated: 01".into(), date(2023, 10, 2), iha,
            Value::Integer(5), "Amended".into(), "North".into(), line.into(),
        ]
    };
    table(FOREST_ROAD_COLUMNS, vec![row(Value::Integer(7)), row(Value::Integer(7))])
}

pub fn road_landscape_unit_rows() -> Table {
    table(&["MAP_LABEL", "LANDSCAPE_UNIT"], vec![
        vec!["R9 01".into(), "Sarita".into()],
        vec!["R9 01".into(), "Central Barkley".into()],
        vec!["R9 01".into(), "Sarita".into()],
    ])
}

pub fn landscape_unit_names() -> Table {
    table(&["LANDSCAPE_UNIT_NAME"], vec![
        vec!["Sarita".into()],
        vec!["Nahmint".into()],
        vec!["Central Barkley".into()],
    ])
}
