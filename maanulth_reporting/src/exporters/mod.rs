// @file: maanulth_reporting/src/exporters/mod.rs
// @description: Output writers for the annual report.
// @author: LAS.

pub mod excel;
pub mod spatial_files;
