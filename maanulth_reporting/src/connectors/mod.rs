// @file: maanulth_reporting/src/connectors/mod.rs
// @description: External data sources: the BCGW warehouse and the First Nation areas layer.
// @author: LAS.

pub mod bcgw;
pub mod first_nations;
