//! Error types for db-dict

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::{MetadataKind, Vendor};

/// Errors that can occur while introspecting a database or rendering its dictionary
#[derive(Error, Debug)]
pub enum DbDictError {
    #[error("Unknown database vendor: {name}")]
    UnknownVendor { name: String },

    #[error("Unsupported output format: {name}")]
    UnsupportedFormat { name: String },

    #[error("No output directory specified")]
    MissingOutputDirectory,

    #[error("{vendor} catalog query for {kind} failed: {message}")]
    CatalogQuery {
        vendor: Vendor,
        kind: MetadataKind,
        message: String,
    },

    #[error("No columns found for table: {table}")]
    NoColumns { table: String },

    #[error("Output file already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read workbook: {path}")]
    WorkbookRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workbook: {message}")]
    Workbook { message: String },

    #[error("Worksheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Worksheet already exists: {name}")]
    DuplicateSheet { name: String },

    #[error("Invalid cell reference: {reference}")]
    InvalidCellRef { reference: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("ZIP error: {message}")]
    ZipError { message: String },
}

impl From<zip::result::ZipError> for DbDictError {
    fn from(err: zip::result::ZipError) -> Self {
        DbDictError::ZipError {
            message: err.to_string(),
        }
    }
}

impl From<roxmltree::Error> for DbDictError {
    fn from(err: roxmltree::Error) -> Self {
        DbDictError::Workbook {
            message: err.to_string(),
        }
    }
}
