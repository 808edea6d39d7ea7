//! Whole-snapshot diff across every resource

use crate::{ResourceDiff, Result};
use diff_processor_common::ProviderSchema;
use std::collections::{BTreeMap, BTreeSet};

/// Diff of every resource present in either snapshot, keyed by resource name
#[derive(Debug, Clone, Default)]
pub struct SchemaDiff<'a> {
    pub resources: BTreeMap<String, ResourceDiff<'a>>,
}

impl<'a> SchemaDiff<'a> {
    pub fn resource(&self, name: &str) -> Option<&ResourceDiff<'a>> {
        self.resources.get(name)
    }

    /// Resources that only exist in the new snapshot
    pub fn added_resources(&self) -> impl Iterator<Item = &str> {
        self.resources
            .values()
            .filter(|diff| diff.old.is_none())
            .map(|diff| diff.name.as_str())
    }

    /// Resources that only exist in the old snapshot
    pub fn removed_resources(&self) -> impl Iterator<Item = &str> {
        self.resources
            .values()
            .filter(|diff| diff.is_removed_resource())
            .map(|diff| diff.name.as_str())
    }

    /// Resources present on both sides
    pub fn retained_resources(&self) -> impl Iterator<Item = &ResourceDiff<'a>> {
        self.resources
            .values()
            .filter(|diff| diff.old.is_some() && diff.new.is_some())
    }
}

/// Diff two provider snapshots
///
/// Fails only when the differ would produce an inconsistent field diff,
/// which indicates a bug rather than a schema condition.
pub fn compute_schema_diff<'a>(
    old: &'a ProviderSchema,
    new: &'a ProviderSchema,
) -> Result<SchemaDiff<'a>> {
    let names: BTreeSet<&String> = old.resources.keys().chain(new.resources.keys()).collect();

    let mut resources = BTreeMap::new();
    for name in names {
        let diff = ResourceDiff::compute(name, old.resource(name), new.resource(name))?;
        resources.insert(name.clone(), diff);
    }

    tracing::info!(resources = resources.len(), "computed schema diff");

    Ok(SchemaDiff { resources })
}
