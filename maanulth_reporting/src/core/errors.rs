// @file: maanulth_reporting/src/core/errors.rs
// @description: Error taxonomy shared by every stage of the reporting pipeline.
// @author: LAS.

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Connection failed! Please verify your login parameters ({0})")]
    Connection(String),

    #[error("Query '{query}' failed: {message}")]
    Query { query: String, message: String },

    #[error("Invalid geometry for {map_label}: {message}")]
    Geometry { map_label: String, message: String },

    #[error("First Nation layer error: {0}")]
    Layer(String),

    #[error("Reprojection failed: {0}")]
    Projection(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Export(e.to_string())
    }
}
