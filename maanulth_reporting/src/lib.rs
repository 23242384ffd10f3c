// @file: maanulth_reporting\src\lib.rs
// @description: Exposes the reporting pipeline for the binary and for tests.
// @author: LAS.

pub mod core;
pub mod connectors;
pub mod exporters;
pub mod utils;

#[cfg(test)]
mod tests;
