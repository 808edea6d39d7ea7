//! Built-in rules over a whole resource diff

use crate::{ResourceFinding, ResourceRule};
use diff_processor_differ::{parent_path, ResourceDiff};

/// Field removed (or renamed, which looks the same) from an existing resource
///
/// Only the outermost removed path is reported: fields of a removed block
/// are covered by the block's own finding.
pub struct FieldRemovalOrRename;

impl ResourceRule for FieldRemovalOrRename {
    fn identifier(&self) -> &'static str {
        "resource-schema-field-removal-or-rename"
    }

    fn description(&self) -> &'static str {
        "A field was removed or renamed on a pre-existing resource"
    }

    fn findings(&self, diff: &ResourceDiff<'_>) -> Vec<ResourceFinding> {
        if diff.old.is_none() || diff.new.is_none() {
            return vec![];
        }

        diff.removed_fields
            .iter()
            .filter(|field| {
                !parent_path(field).is_some_and(|parent| diff.removed_fields.contains(parent))
            })
            .map(|field| ResourceFinding {
                field: field.clone(),
                message: format!(
                    "Field `{}` within resource `{}` was either removed or renamed",
                    field, diff.name
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diff_processor_common::{FieldSchema, ResourceSchema, ValueType};

    fn string() -> FieldSchema {
        FieldSchema::new(ValueType::String).optional()
    }

    #[test]
    fn test_removed_field() {
        let old = ResourceSchema::new()
            .with_field("name", string())
            .with_field("legacy", string());
        let new = ResourceSchema::new().with_field("name", string());

        let diff = ResourceDiff::compute("google_widget", Some(&old), Some(&new)).unwrap();
        assert_eq!(
            FieldRemovalOrRename.findings(&diff),
            vec![ResourceFinding {
                field: "legacy".to_string(),
                message: "Field `legacy` within resource `google_widget` was either removed or renamed"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn test_removed_block_reported_once() {
        let old = ResourceSchema::new().with_field(
            "config",
            FieldSchema::new(ValueType::List).with_block([("mode", string()), ("size", string())]),
        );
        let new = ResourceSchema::new();

        let diff = ResourceDiff::compute("google_widget", Some(&old), Some(&new)).unwrap();
        let fields: Vec<String> = FieldRemovalOrRename
            .findings(&diff)
            .into_iter()
            .map(|f| f.field)
            .collect();
        assert_eq!(fields, vec!["config"]);
    }

    #[test]
    fn test_removed_field_inside_retained_block() {
        let old = ResourceSchema::new().with_field(
            "config",
            FieldSchema::new(ValueType::List).with_block([("mode", string()), ("size", string())]),
        );
        let new = ResourceSchema::new().with_field(
            "config",
            FieldSchema::new(ValueType::List).with_block([("mode", string())]),
        );

        let diff = ResourceDiff::compute("google_widget", Some(&old), Some(&new)).unwrap();
        let fields: Vec<String> = FieldRemovalOrRename
            .findings(&diff)
            .into_iter()
            .map(|f| f.field)
            .collect();
        assert_eq!(fields, vec!["config.size"]);
    }

    #[test]
    fn test_removed_resource_is_not_a_field_removal() {
        let old = ResourceSchema::new().with_field("name", string());

        let diff = ResourceDiff::compute("google_widget", Some(&old), None).unwrap();
        assert!(FieldRemovalOrRename.findings(&diff).is_empty());
    }
}
