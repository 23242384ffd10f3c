// @file: maanulth_reporting\src\tests\mod.rs
// @description: Test suite: fixtures plus one verifier per pipeline stage.
// @author: LAS.

pub mod fixtures;

mod query_verifier;
mod layer_verifier;
mod report_verifier;
