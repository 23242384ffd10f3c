// @file: maanulth_reporting/src/utils/mod.rs
// @description: Configuration and command-line plumbing.
// @author: LAS.

pub mod cli;
pub mod config;
