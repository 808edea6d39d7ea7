//! Schema snapshot loading from YAML and JSON files
//!
//! A snapshot is either a single file holding a `ProviderSchema`, or a
//! directory whose schema files (searched recursively) are merged into one.

use crate::{ProviderSchema, Result, SchemaError};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// On-disk encoding of a schema snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(SnapshotFormat::Yaml),
            Some("json") => Some(SnapshotFormat::Json),
            _ => None,
        }
    }
}

impl ProviderSchema {
    /// Load a snapshot from a file or a directory of files
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load_file(path)
        }
    }

    /// Load a single snapshot file
    pub fn load_file(path: &Path) -> Result<Self> {
        let format = SnapshotFormat::from_path(path)
            .ok_or_else(|| SchemaError::UnsupportedFormat(path.to_path_buf()))?;

        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::Parse(format!("Failed to read schema file {:?}: {}", path, e))
        })?;

        let schema = Self::parse(&content, format).map_err(|e| {
            SchemaError::Parse(format!("Failed to parse schema file {:?}: {}", path, e))
        })?;

        tracing::debug!(
            path = %path.display(),
            resources = schema.resources.len(),
            "loaded schema file"
        );

        Ok(schema)
    }

    /// Load and merge every schema file below a directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut merged = ProviderSchema::new();
        let mut files = 0;

        // Sorted so duplicate detection reports the same file every run
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || SnapshotFormat::from_path(path).is_none() {
                continue;
            }

            let schema = Self::load_file(path)?;
            merged.merge(schema, path)?;
            files += 1;
        }

        if files == 0 {
            return Err(SchemaError::EmptySnapshot(dir.to_path_buf()));
        }

        Ok(merged)
    }

    /// Parse snapshot content in the given format
    pub fn parse(content: &str, format: SnapshotFormat) -> Result<Self> {
        let schema = match format {
            SnapshotFormat::Yaml => serde_yaml::from_str(content)?,
            SnapshotFormat::Json => serde_json::from_str(content)?,
        };
        Ok(schema)
    }

    /// Move every resource of `other` into this snapshot
    ///
    /// `origin` names where `other` came from and is only used in the
    /// duplicate-resource error.
    pub fn merge(&mut self, other: ProviderSchema, origin: &Path) -> Result<()> {
        for (name, resource) in other.resources {
            if self.resources.contains_key(&name) {
                return Err(SchemaError::DuplicateResource {
                    resource: name,
                    path: origin.to_path_buf(),
                });
            }
            self.resources.insert(name, resource);
        }
        Ok(())
    }
}
