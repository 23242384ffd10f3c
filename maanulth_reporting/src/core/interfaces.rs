// @file: maanulth_reporting/src/core/interfaces.rs
// @description: Traits at the seams of the pipeline: the warehouse and the area layer.
// @author: LAS.

use crate::core::errors::ReportResult;
use crate::core::models::Table;
use async_trait::async_trait;
use geo_types::Geometry;
use std::collections::BTreeSet;

//
// TRAIT DEFINITIONS
//

#[async_trait]
pub trait Warehouse: Send + Sync {
    // #1. Run a query and materialise every row
    async fn fetch(&self, sql: &str) -> ReportResult<Table>;

    // #2. Human-readable target, for logs
    fn describe(&self) -> String;
}

/// Named polygons that authorizations are tested against.
pub trait AreaLayer: Send + Sync {
    fn overlapping(&self, geometry: &Geometry<f64>) -> BTreeSet<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
