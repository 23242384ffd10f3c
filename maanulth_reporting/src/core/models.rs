// @file: maanulth_reporting/src/core/models.rs
// @description: Tabular values, query result tables, datasets and the reporting period.
// @author: LAS.

use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use crate::core::errors::{ReportError, ReportResult};


//
// CELL VALUES
//

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // Numeric coercion: unparseable text and nulls yield None.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok()
                    .or_else(|| trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Integer(_) | Value::Float(_) => 0,
            Value::DateTime(_) => 1,
            Value::Text(_) => 2,
            Value::Null => 3,
        }
    }

    // Total order used for sorting; nulls sort last.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}


//
// TABLE
//

/// Ordered columns plus rows aligned to them, the shape every query returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> ReportResult<()> {
        if row.len() != self.columns.len() {
            return Err(ReportError::InvalidInput(format!(
                "row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    pub fn column_values(&self, name: &str) -> Vec<&Value> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| &r[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Removes a column, returning its values in row order.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<Value>> {
        let idx = self.column_index(name)?;
        self.columns.remove(idx);
        Some(self.rows.iter_mut().map(|r| r.remove(idx)).collect())
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(Value::Null);
                }
                self.columns.len() - 1
            }
        }
    }

    pub fn set_constant(&mut self, name: &str, value: Value) {
        let idx = self.ensure_column(name);
        for row in &mut self.rows {
            row[idx] = value.clone();
        }
    }

    /// Rewrites a column in place, adding it (as nulls) first if absent.
    pub fn map_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&Value) -> Value,
    {
        let idx = self.ensure_column(name);
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
    }

    /// Left merge of a per-key value: rows whose key has no entry get Null.
    pub fn merge_by_key(&mut self, key: &str, name: &str, lookup: &HashMap<String, Value>) {
        let Some(key_idx) = self.column_index(key) else { return };
        let idx = self.ensure_column(name);
        for row in &mut self.rows {
            let merged = row[key_idx]
                .as_text()
                .and_then(|k| lookup.get(&k).cloned())
                .unwrap_or(Value::Null);
            row[idx] = merged;
        }
    }

    /// Keeps the first row for every distinct combination of `keys`.
    pub fn dedup_by(&mut self, keys: &[&str]) {
        let indices: Vec<usize> = keys.iter().filter_map(|k| self.column_index(k)).collect();
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        self.rows.retain(|row| {
            let key: Vec<String> = indices.iter().map(|&i| row_key(&row[i])).collect();
            seen.insert(key)
        });
    }

    /// Drops rows identical to an earlier row in every column.
    pub fn dedup_rows(&mut self) {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        self.rows.retain(|row| seen.insert(row.iter().map(row_key).collect()));
    }

    pub fn sort_by(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            self.rows.sort_by(|a, b| a[idx].compare(&b[idx]));
        }
    }

    /// Reorders to `layout`; columns missing from the table come out null.
    pub fn project(&self, layout: &[&str]) -> Table {
        let indices: Vec<Option<usize>> = layout.iter().map(|c| self.column_index(c)).collect();
        let rows = self.rows.iter()
            .map(|row| {
                indices.iter()
                    .map(|idx| idx.map(|i| row[i].clone()).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Table {
            columns: layout.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

// Type-tagged so that Text("1") and Integer(1) stay distinct.
fn row_key(value: &Value) -> String {
    match value {
        Value::Null => "\0null".to_string(),
        Value::Text(s) => format!("t:{}", s),
        Value::Integer(i) => format!("n:{}", i),
        Value::Float(f) => format!("n:{}", f),
        Value::DateTime(dt) => format!("d:{}", dt),
    }
}


//
// DATASETS
//

pub const MAP_LABEL: &str = "MAP_LABEL";
pub const SHAPE: &str = "SHAPE";
pub const IHA_ID: &str = "IHA_ID";
pub const LANDSCAPE_UNIT: &str = "LANDSCAPE_UNIT";
pub const TENURE_LENGTH_YRS: &str = "TENURE_LENGTH_YRS";
pub const FIRST_NATION: &str = "FN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    ForestAuth,
    ForestRoad,
    SpecUse,
    RecrPoly,
    RecrLine,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::ForestAuth,
        Dataset::ForestRoad,
        Dataset::SpecUse,
        Dataset::RecrPoly,
        Dataset::RecrLine,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dataset::ForestAuth => "forest_auth",
            Dataset::ForestRoad => "forest_road",
            Dataset::SpecUse => "spec_use",
            Dataset::RecrPoly => "recr_poly",
            Dataset::RecrLine => "recr_line",
        }
    }

    // Roads pick up landscape units from a follow-up query instead of a join.
    pub fn joins_landscape_units(&self) -> bool {
        !matches!(self, Dataset::ForestRoad)
    }

    pub fn is_recreation(&self) -> bool {
        matches!(self, Dataset::RecrPoly | Dataset::RecrLine)
    }

    pub fn measure_column(&self) -> &'static str {
        match self {
            Dataset::ForestAuth | Dataset::SpecUse | Dataset::RecrPoly => "AREA_HA",
            Dataset::ForestRoad => "ROAD_SECTION_LENGTH_KM",
            Dataset::RecrLine => "LENGTH_KM",
        }
    }

    pub fn description_column(&self) -> &'static str {
        if self.is_recreation() { "PROJECT_TYPE" } else { "FILE_TYPE_DESCRIPTION" }
    }

    pub fn date_column(&self) -> &'static str {
        match self {
            Dataset::ForestAuth | Dataset::SpecUse => "ISSUE_DATE",
            _ => "ENTRY_TIMESTAMP",
        }
    }

    pub fn layout(&self) -> &'static [&'static str] {
        match self {
            Dataset::ForestAuth | Dataset::SpecUse => &[
                "REGION", "LANDSCAPE_UNIT", "MAP_LABEL", "AGENCY", "LEGISLATION", "FILE_TYPE_DESCRIPTION",
                "FILE_STATUS_CODE", "FILE_TYPE_CODE", "NEW_AMEND", "ISSUE_DATE", "TENURE_LENGTH_YRS",
                "AREA_HA", "SPATIAL", "LAT_LONG", "IS_IHA", "IHA_ID", "DID_ENGAGE_OCCUR", "IF_NO_ENGAGE",
                "FN", "AMEND_DATE",
            ],
            Dataset::ForestRoad => &[
                "REGION", "LANDSCAPE_UNIT", "MAP_LABEL", "FILE_AMEND_SECTION", "AGENCY", "LEGISLATION",
                "FILE_TYPE_DESCRIPTION", "FILE_STATUS_CODE", "FILE_TYPE_CODE", "NEW_AMEND", "ENTRY_TIMESTAMP",
                "TENURE_LENGTH_YRS", "ROAD_SECTION_LENGTH_KM", "SPATIAL", "LAT_LONG", "IS_IHA", "IHA_ID",
                "DID_ENGAGE_OCCUR", "IF_NO_ENGAGE", "FN", "AMEND_DATE",
            ],
            Dataset::RecrPoly => &[
                "REGION", "LANDSCAPE_UNIT", "MAP_LABEL", "AGENCY", "LEGISLATION", "PROJECT_TYPE",
                "FILE_STATUS_CODE", "FILE_TYPE_CODE", "NEW_AMEND", "ENTRY_TIMESTAMP", "TENURE_LENGTH_YRS",
                "AREA_HA", "SPATIAL", "LAT_LONG", "IS_IHA", "IHA_ID", "DID_ENGAGE_OCCUR", "IF_NO_ENGAGE",
                "FN", "AMEND_DATE",
            ],
            Dataset::RecrLine => &[
                "REGION", "LANDSCAPE_UNIT", "MAP_LABEL", "AGENCY", "LEGISLATION", "PROJECT_TYPE",
                "FILE_STATUS_CODE", "FILE_TYPE_CODE", "NEW_AMEND", "ENTRY_TIMESTAMP", "TENURE_LENGTH_YRS",
                "LENGTH_KM", "SPATIAL", "LAT_LONG", "IS_IHA", "IHA_ID", "DID_ENGAGE_OCCUR", "IF_NO_ENGAGE",
                "FN", "AMEND_DATE",
            ],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}


//
// REPORTING PERIOD
//

/// Reporting year `y` covers 1 September of `y - 1` through 31 August of `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    year: i32,
}

impl ReportingPeriod {
    pub const MIN_YEAR: i32 = 2000;
    pub const MAX_YEAR: i32 = 2100;

    pub fn new(year: i32) -> ReportResult<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(ReportError::InvalidInput(format!(
                "reporting year {} is outside {}..={}",
                year,
                Self::MIN_YEAR,
                Self::MAX_YEAR
            )));
        }
        Ok(Self { year })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn previous_year(&self) -> i32 {
        self.year - 1
    }

    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.previous_year(), 9, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn end(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, 8, 31).unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} to {}", self.start(), self.end())
    }
}
