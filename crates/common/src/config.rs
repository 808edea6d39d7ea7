//! Run configuration loaded from YAML
//!
//! Lets an operator accept known, intentional breaking changes: whole rules
//! can be skipped, or individual violations allow-listed per resource and
//! field.

use crate::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root structure of a run configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiffConfig {
    /// Rule identifiers removed from the active rule set
    #[serde(default)]
    pub skip_rules: Vec<String>,
    /// Individual violations accepted for this run
    #[serde(default)]
    pub allow: Vec<AllowEntry>,
}

/// A single accepted violation pattern
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AllowEntry {
    /// Rule identifier the entry applies to
    pub rule: String,
    /// Regular expression matched against the whole resource name
    pub resource: String,
    /// Exact field path; every field of the resource when unset
    #[serde(default)]
    pub field: Option<String>,
    /// Why the change was accepted
    #[serde(default)]
    pub reason: Option<String>,
}

impl DiffConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            SchemaError::Parse(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Add rule identifiers to skip, keeping the list free of duplicates
    pub fn skip_rules_from<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for rule in rules {
            let rule = rule.into();
            if !self.skip_rules.contains(&rule) {
                self.skip_rules.push(rule);
            }
        }
        self
    }
}
