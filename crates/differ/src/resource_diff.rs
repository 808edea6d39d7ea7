//! Per-resource diff and the resource-level facts rules rely on

use crate::{DiffError, FieldDiff, Result};
use diff_processor_common::{FieldSchema, ResourceSchema};
use std::collections::{BTreeMap, BTreeSet};

/// Resource-level facts about the diff a field belongs to
///
/// Field rules only see a single `FieldDiff`; whether a change is breaking
/// can also depend on whether the surrounding resource or nested block
/// existed before.
pub trait ResourceDiffContext {
    /// The resource type itself is new
    fn is_new_resource(&self) -> bool;

    /// The block immediately containing `field` did not exist in the old schema
    fn is_field_in_new_nested_structure(&self, field: &str) -> bool;
}

/// Diff of one resource between the old and new snapshot
#[derive(Debug, Clone)]
pub struct ResourceDiff<'a> {
    pub name: String,
    pub old: Option<&'a ResourceSchema>,
    pub new: Option<&'a ResourceSchema>,
    /// Every field path present on either side
    pub fields: BTreeMap<String, FieldDiff<'a>>,
    pub added_fields: BTreeSet<String>,
    pub removed_fields: BTreeSet<String>,
    /// Nested-block paths with no field of that path in the old schema
    pub added_blocks: BTreeSet<String>,
    /// Nested-block paths with no field of that path in the new schema
    pub removed_blocks: BTreeSet<String>,
}

/// Field paths of one resource version, flattened
#[derive(Default)]
struct Flattened<'a> {
    fields: BTreeMap<String, &'a FieldSchema>,
    blocks: BTreeSet<String>,
}

impl<'a> Flattened<'a> {
    fn from_resource(resource: Option<&'a ResourceSchema>) -> Self {
        let mut flattened = Self::default();
        if let Some(resource) = resource {
            flattened.walk(None, &resource.fields);
        }
        flattened
    }

    fn walk(&mut self, prefix: Option<&str>, fields: &'a BTreeMap<String, FieldSchema>) {
        for (name, field) in fields {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, name),
                None => name.clone(),
            };

            if let Some(children) = field.block() {
                self.blocks.insert(path.clone());
                self.walk(Some(&path), children);
            }
            self.fields.insert(path, field);
        }
    }
}

impl<'a> ResourceDiff<'a> {
    /// Diff two versions of a resource; either side may be absent
    pub fn compute(
        name: &str,
        old: Option<&'a ResourceSchema>,
        new: Option<&'a ResourceSchema>,
    ) -> Result<Self> {
        let old_flat = Flattened::from_resource(old);
        let new_flat = Flattened::from_resource(new);

        let paths: BTreeSet<&String> = old_flat
            .fields
            .keys()
            .chain(new_flat.fields.keys())
            .collect();

        let mut fields = BTreeMap::new();
        let mut added_fields = BTreeSet::new();
        let mut removed_fields = BTreeSet::new();

        for path in paths {
            let old_field = old_flat.fields.get(path).copied();
            let new_field = new_flat.fields.get(path).copied();
            let diff = FieldDiff::new(old_field, new_field).ok_or_else(|| {
                DiffError::EmptyFieldDiff {
                    resource: name.to_string(),
                    field: path.clone(),
                }
            })?;

            if diff.is_added() {
                added_fields.insert(path.clone());
            } else if diff.is_removed() {
                removed_fields.insert(path.clone());
            }
            fields.insert(path.clone(), diff);
        }

        let added_blocks = new_flat
            .blocks
            .iter()
            .filter(|path| !old_flat.fields.contains_key(*path))
            .cloned()
            .collect();
        let removed_blocks = old_flat
            .blocks
            .iter()
            .filter(|path| !new_flat.fields.contains_key(*path))
            .cloned()
            .collect();

        tracing::debug!(
            resource = name,
            fields = fields.len(),
            added = added_fields.len(),
            removed = removed_fields.len(),
            "computed resource diff"
        );

        Ok(Self {
            name: name.to_string(),
            old,
            new,
            fields,
            added_fields,
            removed_fields,
            added_blocks,
            removed_blocks,
        })
    }

    /// The resource only exists in the old snapshot
    pub fn is_removed_resource(&self) -> bool {
        self.old.is_some() && self.new.is_none()
    }

    /// Whether anything about the resource differs between the snapshots
    pub fn is_changed(&self) -> bool {
        self.old.is_none()
            || self.new.is_none()
            || self.fields.values().any(|diff| diff.is_changed())
    }

    /// Field paths whose two sides differ, in path order
    pub fn changed_fields(&self) -> impl Iterator<Item = (&str, &FieldDiff<'a>)> {
        self.fields
            .iter()
            .filter(|(_, diff)| diff.is_changed())
            .map(|(path, diff)| (path.as_str(), diff))
    }
}

impl ResourceDiffContext for ResourceDiff<'_> {
    fn is_new_resource(&self) -> bool {
        self.old.is_none() && self.new.is_some()
    }

    fn is_field_in_new_nested_structure(&self, field: &str) -> bool {
        parent_path(field).is_some_and(|parent| self.added_blocks.contains(parent))
    }
}

/// Path of the block immediately containing `field`, `None` at the top level
pub fn parent_path(field: &str) -> Option<&str> {
    field.rsplit_once('.').map(|(parent, _)| parent)
}
