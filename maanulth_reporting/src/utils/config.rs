// @file: maanulth_reporting/src/utils/config.rs
// @description: Layered configuration: built-in defaults, optional config file, APP_ environment.
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};
use crate::core::errors::ReportResult;

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Warehouse
    pub bcgw_connect_string: String,

    // First Nation areas layer
    pub first_nations_layer: String,
    pub first_nations_name_field: String,

    // Outputs
    pub workbook_prefix: String,
    pub geojson_prefix: String,
    pub output_epsg: u32,
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> ReportResult<Self> {
        let config = Self::builder()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Defaults only, no file or environment overrides.
    pub fn defaults() -> ReportResult<Self> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("bcgw_connect_string", "bcgw.bcgov/idwprod1.bcgov")?
            .set_default("first_nations_layer", "data/PreTreatyFirstNationAreas.shp")?
            .set_default("first_nations_name_field", "FN_area_r")?
            .set_default("workbook_prefix", "Maanulth_FRPA_annualReporting_tables")?
            .set_default("geojson_prefix", "maanulth")?
            .set_default("output_epsg", 3857)
    }
}
