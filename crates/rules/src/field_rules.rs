//! Built-in rules over individual field diffs
//!
//! Each rule is a separate policy decision. Rules comparing attributes of a
//! field skip added and removed fields; rules about newly added fields skip
//! new resources and fields inside newly added nested blocks, since neither
//! can be referenced by an existing configuration.

use crate::FieldRule;
use diff_processor_common::DefaultValue;
use diff_processor_differ::{FieldDiff, ResourceDiffContext};

/// Value or element type of a field changed
pub struct FieldChangingType;

impl FieldRule for FieldChangingType {
    fn identifier(&self) -> &'static str {
        "field-changing-type"
    }

    fn description(&self) -> &'static str {
        "A field's type or collection element type changed"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        if old.value_type != new.value_type {
            return vec![format!(
                "Field `{}` changed from {} to {} on `{}`",
                field, old.value_type, new.value_type, resource
            )];
        }

        match (old.elem_type(), new.elem_type()) {
            (Some(old_elem), Some(new_elem)) if old_elem != new_elem => vec![format!(
                "Field `{}` changed from {}.{} to {}.{} on `{}`",
                field, old.value_type, old_elem, new.value_type, new_elem, resource
            )],
            _ => vec![],
        }
    }
}

/// Required field added to an existing resource
pub struct FieldNewRequired;

impl FieldRule for FieldNewRequired {
    fn identifier(&self) -> &'static str {
        "no-new-required"
    }

    fn description(&self) -> &'static str {
        "A required field was added to a pre-existing resource"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        if context.is_new_resource() || context.is_field_in_new_nested_structure(field) {
            return vec![];
        }

        match (diff.old_schema(), diff.new_schema()) {
            (None, Some(new)) if new.required => vec![format!(
                "Field `{}` added as required on pre-existing resource `{}`",
                field, resource
            )],
            _ => vec![],
        }
    }
}

/// Optional force-new field with a default added to an existing resource
///
/// Existing resources would plan a replacement to apply the default.
pub struct FieldNewOptionalFieldWithDefault;

impl FieldRule for FieldNewOptionalFieldWithDefault {
    fn identifier(&self) -> &'static str {
        "no-new-optional-default"
    }

    fn description(&self) -> &'static str {
        "An optional force-new field with a default was added to a pre-existing resource"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        if context.is_new_resource() || context.is_field_in_new_nested_structure(field) {
            return vec![];
        }

        match (diff.old_schema(), diff.new_schema()) {
            (None, Some(new)) if new.optional && new.default.is_some() && new.force_new => {
                vec![format!(
                    "Field `{}` added as optional with a default value and force new on \
                     pre-existing resource `{}`. This can be allowed if there is a confirmed \
                     API-level default that matches the schema default",
                    field, resource
                )]
            }
            _ => vec![],
        }
    }
}

/// Field went from optional to required
pub struct FieldBecomingRequired;

impl FieldRule for FieldBecomingRequired {
    fn identifier(&self) -> &'static str {
        "field-optional-to-required"
    }

    fn description(&self) -> &'static str {
        "An optional field became required"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        if !old.required && new.required {
            return vec![format!(
                "Field `{}` changed from optional to required on `{}`",
                field, resource
            )];
        }
        vec![]
    }
}

/// Field became computed only and can no longer be set
pub struct FieldBecomingComputedOnly;

impl FieldRule for FieldBecomingComputedOnly {
    fn identifier(&self) -> &'static str {
        "field-becoming-computed"
    }

    fn description(&self) -> &'static str {
        "A user-settable field became computed only"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        // Already computed only
        if old.is_computed_only() {
            return vec![];
        }

        if new.is_computed_only() {
            return vec![format!(
                "Field `{}` became Computed only on `{}`",
                field, resource
            )];
        }
        vec![]
    }
}

/// Field lost `computed` while staying optional
///
/// Configurations that omitted the field relied on the provider filling it
/// in; they now plan a diff against the API value.
pub struct FieldOptionalComputedToOptional;

impl FieldRule for FieldOptionalComputedToOptional {
    fn identifier(&self) -> &'static str {
        "field-oc-to-c"
    }

    fn description(&self) -> &'static str {
        "An optional+computed field became optional only"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        if old.is_optional_computed() && new.optional && !new.computed {
            return vec![format!(
                "Field `{}` transitioned from optional+computed to optional on `{}`",
                field, resource
            )];
        }
        vec![]
    }
}

/// Schema default changed
pub struct FieldDefaultModification;

impl FieldRule for FieldDefaultModification {
    fn identifier(&self) -> &'static str {
        "field-changing-default-value"
    }

    fn description(&self) -> &'static str {
        "A field's default value changed"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        if old.default != new.default {
            return vec![format!(
                "Field `{}` default value changed from `{}` to `{}` on `{}`",
                field,
                format_default_value(old.default.as_ref()),
                format_default_value(new.default.as_ref()),
                resource
            )];
        }
        vec![]
    }
}

/// MinItems increased
pub struct FieldGrowingMin;

impl FieldRule for FieldGrowingMin {
    fn identifier(&self) -> &'static str {
        "field-growing-min"
    }

    fn description(&self) -> &'static str {
        "A collection field's MinItems increased"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        if old.min_items < new.min_items {
            return vec![format!(
                "Field `{}` MinItems went from {} to {} on `{}`",
                field,
                format_item_bound(old.min_items),
                new.min_items,
                resource
            )];
        }
        vec![]
    }
}

/// MaxItems set or decreased
pub struct FieldShrinkingMax;

impl FieldRule for FieldShrinkingMax {
    fn identifier(&self) -> &'static str {
        "field-shrinking-max"
    }

    fn description(&self) -> &'static str {
        "A collection field's MaxItems was introduced or decreased"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        // Unset on the new side never restricts anything
        if new.max_items == 0 {
            return vec![];
        }

        if old.max_items == 0 || old.max_items > new.max_items {
            return vec![format!(
                "Field `{}` MaxItems went from {} to {} on `{}`",
                field,
                format_item_bound(old.max_items),
                new.max_items,
                resource
            )];
        }
        vec![]
    }
}

/// Diff suppression was dropped from a field
pub struct FieldRemovingDiffSuppress;

impl FieldRule for FieldRemovingDiffSuppress {
    fn identifier(&self) -> &'static str {
        "field-removing-diff-suppress"
    }

    fn description(&self) -> &'static str {
        "A field lost its diff suppress function"
    }

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        _context: &dyn ResourceDiffContext,
    ) -> Vec<String> {
        let Some((old, new)) = diff.both() else {
            return vec![];
        };

        if old.diff_suppressed && !new.diff_suppressed {
            return vec![format!(
                "Field `{}` lost its diff suppress function on `{}`",
                field, resource
            )];
        }
        vec![]
    }
}

/// Format a default so absent, empty string and other values read differently
pub fn format_default_value(value: Option<&DefaultValue>) -> String {
    match value {
        None => "<nil>".to_string(),
        Some(v) if v.is_empty_string() => r#""""#.to_string(),
        Some(v) => v.to_string(),
    }
}

/// Format a MinItems/MaxItems bound, where 0 means unset
fn format_item_bound(bound: u32) -> String {
    if bound == 0 {
        "unset".to_string()
    } else {
        bound.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diff_processor_common::{FieldSchema, ValueType};
    use mockall::mock;

    mock! {
        pub Context {}

        impl ResourceDiffContext for Context {
            fn is_new_resource(&self) -> bool;
            fn is_field_in_new_nested_structure(&self, field: &str) -> bool;
        }
    }

    fn context(new_resource: bool, new_nested: bool) -> MockContext {
        let mut context = MockContext::new();
        context.expect_is_new_resource().return_const(new_resource);
        context
            .expect_is_field_in_new_nested_structure()
            .return_const(new_nested);
        context
    }

    fn existing() -> MockContext {
        context(false, false)
    }

    fn run(
        rule: &dyn FieldRule,
        old: Option<&FieldSchema>,
        new: Option<&FieldSchema>,
        context: &MockContext,
    ) -> Vec<String> {
        let diff = FieldDiff::new(old, new).unwrap();
        rule.messages("google_widget", "size", &diff, context)
    }

    fn string() -> FieldSchema {
        FieldSchema::new(ValueType::String)
    }

    #[test]
    fn test_changing_type() {
        let old = string().optional();
        let new = FieldSchema::new(ValueType::Int).optional();

        assert_eq!(
            run(&FieldChangingType, Some(&old), Some(&new), &existing()),
            vec!["Field `size` changed from TypeString to TypeInt on `google_widget`"]
        );
    }

    #[test]
    fn test_changing_elem_type() {
        let old = FieldSchema::new(ValueType::List).with_elem_type(string());
        let new = FieldSchema::new(ValueType::List).with_elem_type(FieldSchema::new(ValueType::Int));

        assert_eq!(
            run(&FieldChangingType, Some(&old), Some(&new), &existing()),
            vec!["Field `size` changed from TypeList.TypeString to TypeList.TypeInt on `google_widget`"]
        );
    }

    #[test]
    fn test_changing_type_ignores_blocks_and_added_fields() {
        let old = FieldSchema::new(ValueType::List).with_block([("a", string())]);
        let new = FieldSchema::new(ValueType::List).with_block([("b", string().required())]);
        assert!(run(&FieldChangingType, Some(&old), Some(&new), &existing()).is_empty());

        let added = FieldSchema::new(ValueType::Int);
        assert!(run(&FieldChangingType, None, Some(&added), &existing()).is_empty());
        assert!(run(&FieldChangingType, Some(&added), None, &existing()).is_empty());
    }

    #[test]
    fn test_new_required() {
        let new = string().required();

        assert_eq!(
            run(&FieldNewRequired, None, Some(&new), &existing()),
            vec!["Field `size` added as required on pre-existing resource `google_widget`"]
        );
    }

    #[test]
    fn test_new_required_exemptions() {
        let new = string().required();

        assert!(run(&FieldNewRequired, None, Some(&new), &context(true, false)).is_empty());
        assert!(run(&FieldNewRequired, None, Some(&new), &context(false, true)).is_empty());
    }

    #[test]
    fn test_new_required_queries_the_field_path() {
        let mut context = MockContext::new();
        context.expect_is_new_resource().return_const(false);
        context
            .expect_is_field_in_new_nested_structure()
            .returning(|field: &str| field.starts_with("config."));

        let new = string().required();
        let diff = FieldDiff::new(None, Some(&new)).unwrap();

        assert!(FieldNewRequired
            .messages("google_widget", "config.mode", &diff, &context)
            .is_empty());
        assert_eq!(
            FieldNewRequired
                .messages("google_widget", "mode", &diff, &context)
                .len(),
            1
        );
    }

    #[test]
    fn test_new_required_ignores_optional_and_existing_fields() {
        let optional = string().optional();
        assert!(run(&FieldNewRequired, None, Some(&optional), &existing()).is_empty());

        let required = string().required();
        assert!(run(&FieldNewRequired, Some(&required), Some(&required), &existing()).is_empty());
    }

    #[test]
    fn test_new_optional_with_default_and_force_new() {
        let new = string().optional().with_default("PREMIUM").force_new();

        let messages = run(&FieldNewOptionalFieldWithDefault, None, Some(&new), &existing());
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(
            "Field `size` added as optional with a default value and force new on pre-existing resource `google_widget`."
        ));
        assert!(messages[0].ends_with("matches the schema default"));
    }

    #[test]
    fn test_new_optional_with_default_requires_all_conditions() {
        let no_force_new = string().optional().with_default("PREMIUM");
        let no_default = string().optional().force_new();
        let required = string().required().with_default("PREMIUM").force_new();

        for new in [&no_force_new, &no_default, &required] {
            assert!(run(&FieldNewOptionalFieldWithDefault, None, Some(new), &existing()).is_empty());
        }

        let new = string().optional().with_default("PREMIUM").force_new();
        assert!(run(&FieldNewOptionalFieldWithDefault, None, Some(&new), &context(true, false)).is_empty());
        assert!(run(&FieldNewOptionalFieldWithDefault, None, Some(&new), &context(false, true)).is_empty());
    }

    #[test]
    fn test_becoming_required() {
        let old = string().optional();
        let new = string().required();

        assert_eq!(
            run(&FieldBecomingRequired, Some(&old), Some(&new), &existing()),
            vec!["Field `size` changed from optional to required on `google_widget`"]
        );
        assert!(run(&FieldBecomingRequired, Some(&new), Some(&old), &existing()).is_empty());
        assert!(run(&FieldBecomingRequired, None, Some(&new), &existing()).is_empty());
    }

    #[test]
    fn test_becoming_computed_only() {
        let optional = string().optional();
        let optional_computed = string().optional().computed();
        let computed = string().computed();

        let expected = vec!["Field `size` became Computed only on `google_widget`"];
        assert_eq!(
            run(&FieldBecomingComputedOnly, Some(&optional), Some(&computed), &existing()),
            expected
        );
        assert_eq!(
            run(&FieldBecomingComputedOnly, Some(&optional_computed), Some(&computed), &existing()),
            expected
        );
        assert!(run(&FieldBecomingComputedOnly, Some(&computed), Some(&computed), &existing()).is_empty());
        assert!(run(&FieldBecomingComputedOnly, Some(&computed), Some(&optional), &existing()).is_empty());
    }

    #[test]
    fn test_optional_computed_to_optional() {
        let old = FieldSchema::new(ValueType::Int).optional().computed();
        let new = FieldSchema::new(ValueType::Int).optional();

        assert_eq!(
            run(&FieldOptionalComputedToOptional, Some(&old), Some(&new), &existing()),
            vec!["Field `size` transitioned from optional+computed to optional on `google_widget`"]
        );
        assert!(run(&FieldOptionalComputedToOptional, Some(&new), Some(&old), &existing()).is_empty());

        let computed_only = FieldSchema::new(ValueType::Int).computed();
        assert!(
            run(&FieldOptionalComputedToOptional, Some(&old), Some(&computed_only), &existing())
                .is_empty()
        );
    }

    #[test]
    fn test_default_tri_state() {
        let absent = string().optional();
        let empty = string().optional().with_default("");
        let foo = string().optional().with_default("foo");

        assert_eq!(
            run(&FieldDefaultModification, Some(&absent), Some(&empty), &existing()),
            vec!["Field `size` default value changed from `<nil>` to `\"\"` on `google_widget`"]
        );
        assert_eq!(
            run(&FieldDefaultModification, Some(&empty), Some(&foo), &existing()),
            vec!["Field `size` default value changed from `\"\"` to `foo` on `google_widget`"]
        );
        assert_eq!(
            run(&FieldDefaultModification, Some(&foo), Some(&absent), &existing()),
            vec!["Field `size` default value changed from `foo` to `<nil>` on `google_widget`"]
        );
        assert!(run(&FieldDefaultModification, Some(&foo), Some(&foo.clone()), &existing()).is_empty());
    }

    #[test]
    fn test_default_type_change_is_a_change() {
        let int = FieldSchema::new(ValueType::Int).with_default(DefaultValue::Int(1));
        let float = FieldSchema::new(ValueType::Int).with_default(DefaultValue::Float(1.5));

        assert_eq!(
            run(&FieldDefaultModification, Some(&int), Some(&float), &existing()),
            vec!["Field `size` default value changed from `1` to `1.5` on `google_widget`"]
        );
    }

    #[test]
    fn test_growing_min() {
        let unset = FieldSchema::new(ValueType::List);
        let one = FieldSchema::new(ValueType::List).with_min_items(1);
        let two = FieldSchema::new(ValueType::List).with_min_items(2);

        assert_eq!(
            run(&FieldGrowingMin, Some(&unset), Some(&one), &existing()),
            vec!["Field `size` MinItems went from unset to 1 on `google_widget`"]
        );
        assert_eq!(
            run(&FieldGrowingMin, Some(&one), Some(&two), &existing()),
            vec!["Field `size` MinItems went from 1 to 2 on `google_widget`"]
        );
        assert!(run(&FieldGrowingMin, Some(&two), Some(&one), &existing()).is_empty());
        assert!(run(&FieldGrowingMin, Some(&two), Some(&unset), &existing()).is_empty());
    }

    #[test]
    fn test_shrinking_max() {
        let unset = FieldSchema::new(ValueType::List);
        let one = FieldSchema::new(ValueType::List).with_max_items(1);
        let three = FieldSchema::new(ValueType::List).with_max_items(3);

        assert_eq!(
            run(&FieldShrinkingMax, Some(&unset), Some(&three), &existing()),
            vec!["Field `size` MaxItems went from unset to 3 on `google_widget`"]
        );
        assert_eq!(
            run(&FieldShrinkingMax, Some(&three), Some(&one), &existing()),
            vec!["Field `size` MaxItems went from 3 to 1 on `google_widget`"]
        );
        assert!(run(&FieldShrinkingMax, Some(&one), Some(&three), &existing()).is_empty());
    }

    #[test]
    fn test_shrinking_max_ignores_unset_new_bound() {
        let unset = FieldSchema::new(ValueType::List);
        for old_max in [0, 1, 5, 100] {
            let old = FieldSchema::new(ValueType::List).with_max_items(old_max);
            assert!(run(&FieldShrinkingMax, Some(&old), Some(&unset), &existing()).is_empty());
        }
    }

    #[test]
    fn test_removing_diff_suppress() {
        let old = string().optional().diff_suppressed();
        let new = string().optional();

        assert_eq!(
            run(&FieldRemovingDiffSuppress, Some(&old), Some(&new), &existing()),
            vec!["Field `size` lost its diff suppress function on `google_widget`"]
        );
        assert!(run(&FieldRemovingDiffSuppress, Some(&new), Some(&old), &existing()).is_empty());
        assert!(run(&FieldRemovingDiffSuppress, Some(&old), None, &existing()).is_empty());
    }

    #[test]
    fn test_format_default_value() {
        assert_eq!(format_default_value(None), "<nil>");
        assert_eq!(format_default_value(Some(&DefaultValue::from(""))), "\"\"");
        assert_eq!(format_default_value(Some(&DefaultValue::from("foo"))), "foo");
        assert_eq!(format_default_value(Some(&DefaultValue::Bool(false))), "false");
        assert_eq!(format_default_value(Some(&DefaultValue::Int(42))), "42");
    }
}
