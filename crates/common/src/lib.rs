//! Common types and utilities for the diff processor
//!
//! This crate contains the resource schema model both provider versions are
//! expressed in, loading of schema snapshots from disk, and the run
//! configuration file shared by the rule engine and the CLI.

mod config;
mod schema;
mod snapshot;

pub use config::{AllowEntry, DiffConfig};
pub use schema::{DefaultValue, FieldElem, FieldSchema, ProviderSchema, ResourceSchema, ValueType};
pub use snapshot::SnapshotFormat;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading schemas or configuration
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported snapshot file {0:?}: expected .yaml, .yml or .json")]
    UnsupportedFormat(PathBuf),

    #[error("Resource `{resource}` is defined more than once (again in {path:?})")]
    DuplicateResource { resource: String, path: PathBuf },

    #[error("No schema files found in {0:?}")]
    EmptySnapshot(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for schema and configuration operations
pub type Result<T> = std::result::Result<T, SchemaError>;
