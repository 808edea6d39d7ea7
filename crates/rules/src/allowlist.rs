//! Accepted violations that should not fail a run

use crate::{Result, RuleError, Violation};
use diff_processor_common::AllowEntry;
use regex::Regex;

/// Compiled allow-list entries
#[derive(Debug, Default)]
pub struct Allowlist {
    entries: Vec<CompiledEntry>,
}

#[derive(Debug)]
struct CompiledEntry {
    rule: String,
    resource: Regex,
    field: Option<String>,
}

impl Allowlist {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile entries; resource patterns must match the whole resource name
    pub fn compile(entries: &[AllowEntry]) -> Result<Self> {
        let entries = entries
            .iter()
            .map(|entry| {
                let resource = Regex::new(&format!("^(?:{})$", entry.resource)).map_err(|source| {
                    RuleError::InvalidPattern {
                        pattern: entry.resource.clone(),
                        source,
                    }
                })?;
                Ok(CompiledEntry {
                    rule: entry.rule.clone(),
                    resource,
                    field: entry.field.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Whether some entry accepts this violation
    pub fn allows(&self, violation: &Violation) -> bool {
        self.entries.iter().any(|entry| {
            entry.rule == violation.rule
                && entry.resource.is_match(&violation.resource)
                && entry
                    .field
                    .as_deref()
                    .map_or(true, |field| field == violation.field)
        })
    }

    /// Rule identifiers referenced by the entries
    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.rule.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
