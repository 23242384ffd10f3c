// @file: maanulth_reporting\src\core\mod.rs
// @description: Exports domain logic and data structures.
// @author: LAS.

pub mod errors;
pub mod models;
pub mod queries;
pub mod spatial;
pub mod transform;
pub mod engine;
pub mod interfaces;
