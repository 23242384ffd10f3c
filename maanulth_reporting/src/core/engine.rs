// @file: maanulth_reporting/src/core/engine.rs
// @description: Runs the annual report: landscape units, dataset queries, cleanup, exports.
// @author: LAS.

use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::core::errors::{ReportError, ReportResult};
use crate::core::interfaces::{AreaLayer, Warehouse};
use crate::core::models::{Dataset, ReportingPeriod, Table};
use crate::core::queries;
use crate::core::spatial::{OutputCrs, Reprojector};
use crate::core::transform::{self, CleanedDataset};
use crate::exporters::{excel, spatial_files};
use crate::utils::config::AppConfig;


//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub workbook_prefix: String,
    pub geojson_prefix: String,
    pub crs: OutputCrs,
}

impl OutputSettings {
    pub fn from_config(config: &AppConfig) -> ReportResult<Self> {
        Ok(Self {
            workbook_prefix: config.workbook_prefix.clone(),
            geojson_prefix: config.geojson_prefix.clone(),
            crs: OutputCrs::from_epsg(config.output_epsg)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportSummary {
    pub rows: Vec<(Dataset, usize)>,
    pub workbook: Option<PathBuf>,
    pub spatial_files: Vec<PathBuf>,
}

impl ReportSummary {
    pub fn rows_for(&self, dataset: Dataset) -> Option<usize> {
        self.rows.iter().find(|(d, _)| *d == dataset).map(|(_, n)| *n)
    }
}


//
// ENGINE STRUCT
//

pub struct ReportEngine<'a> {
    warehouse: &'a dyn Warehouse,
    layer: &'a dyn AreaLayer,
    outputs: OutputSettings,
}

impl<'a> ReportEngine<'a> {
    pub fn new(warehouse: &'a dyn Warehouse, layer: &'a dyn AreaLayer, outputs: OutputSettings) -> Self {
        Self { warehouse, layer, outputs }
    }

    pub async fn run(&self, period: &ReportingPeriod, workspace: &Path) -> ReportResult<ReportSummary> {
        info!("Reporting period {} against {}", period, self.warehouse.describe());
        if self.layer.is_empty() {
            warn!("First Nation areas layer is empty; FN column will be blank");
        }

        std::fs::create_dir_all(workspace)?;
        let reprojector = Reprojector::new(self.outputs.crs)?;

        // #1. Landscape units overlapping Maa-nulth land
        let landscape_units = self.landscape_units().await?;

        // #2. Datasets, in sheet order
        let mut summary = ReportSummary::default();
        let mut cleaned_sets: Vec<CleanedDataset> = Vec::new();

        for dataset in Dataset::ALL {
            info!("Working on {}", dataset);
            let sql = queries::render(dataset, period, &landscape_units);
            let raw = self.warehouse.fetch(&sql).await?;

            if raw.is_empty() {
                info!("Query {} returned no rows - no report will be produced", dataset);
                continue;
            }

            let road_units = if dataset.joins_landscape_units() {
                None
            } else {
                Some(self.road_landscape_units(&raw).await?)
            };

            let cleaned = transform::clean(dataset, raw, road_units.as_ref(), self.layer);

            // #3. Spatial file per dataset
            let path = spatial_files::geojson_path(workspace, &self.outputs.geojson_prefix, dataset.key(), period.year());
            spatial_files::write_geojson(&path, &cleaned, &reprojector)?;

            summary.rows.push((dataset, cleaned.table.len()));
            summary.spatial_files.push(path);
            cleaned_sets.push(cleaned);
        }

        // #4. Workbook
        if cleaned_sets.is_empty() {
            warn!("No dataset returned rows for {}; no workbook written", period);
        } else {
            let path = excel::workbook_path(workspace, &self.outputs.workbook_prefix, period.year());
            excel::write_workbook(&path, &cleaned_sets)?;
            summary.workbook = Some(path);
        }

        Ok(summary)
    }


    //
    // INTERNAL HELPERS
    //

    async fn landscape_units(&self) -> ReportResult<Vec<String>> {
        info!("Executing query for landscape unit names");
        let table = self.warehouse.fetch(queries::LANDSCAPE_UNITS_SQL).await?;
        if !table.is_empty() && !table.has_column(queries::LANDSCAPE_UNIT_COLUMN) {
            return Err(ReportError::Query {
                query: "lus".to_string(),
                message: format!("missing column {}", queries::LANDSCAPE_UNIT_COLUMN),
            });
        }

        let mut units: Vec<String> = Vec::new();
        for value in table.column_values(queries::LANDSCAPE_UNIT_COLUMN) {
            if let Some(name) = value.as_text() {
                if !units.contains(&name) {
                    units.push(name);
                }
            }
        }

        if units.is_empty() {
            warn!("No landscape units overlap the Maa-nulth area; unit-joined datasets will be empty");
        } else {
            info!("Found {} landscape units", units.len());
        }
        Ok(units)
    }

    async fn road_landscape_units(&self, roads: &Table) -> ReportResult<Table> {
        let labels = transform::map_labels(roads);
        info!("Executing road landscape unit query for {} map labels", labels.len());
        self.warehouse.fetch(&queries::render_road_landscape_units(&labels)).await
    }
}
