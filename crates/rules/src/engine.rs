//! Rule evaluation over a schema diff

use crate::{Allowlist, ChangeKind, ResourceChange, Result, RuleRegistry, Violation, ViolationReport};
use diff_processor_common::ProviderSchema;
use diff_processor_differ::{compute_schema_diff, ResourceDiff, SchemaDiff};

/// Runs every registered rule against every field of every retained resource
pub struct Engine {
    registry: RuleRegistry,
    allowlist: Allowlist,
}

impl Engine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            allowlist: Allowlist::empty(),
        }
    }

    /// Drop violations accepted by the allow-list from reports
    pub fn with_allowlist(mut self, allowlist: Allowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Diff two snapshots and evaluate the result
    pub fn check(&self, old: &ProviderSchema, new: &ProviderSchema) -> Result<ViolationReport> {
        let diff = compute_schema_diff(old, new)?;
        Ok(self.evaluate(&diff))
    }

    /// Evaluate every rule against a computed diff
    ///
    /// Resources present on one side only become informational notes and are
    /// not run through the rules.
    pub fn evaluate(&self, diff: &SchemaDiff<'_>) -> ViolationReport {
        let mut report = ViolationReport::default();

        for resource in diff.resources.values() {
            match (resource.old, resource.new) {
                (None, Some(_)) => report.resource_changes.push(ResourceChange {
                    resource: resource.name.clone(),
                    kind: ChangeKind::Added,
                }),
                (Some(_), None) => report.resource_changes.push(ResourceChange {
                    resource: resource.name.clone(),
                    kind: ChangeKind::Removed,
                }),
                _ => self.evaluate_resource(resource, &mut report),
            }
        }

        tracing::info!(
            violations = report.violations.len(),
            suppressed = report.suppressed,
            resource_changes = report.resource_changes.len(),
            "evaluated breaking-change rules"
        );

        report
    }

    fn evaluate_resource(&self, resource: &ResourceDiff<'_>, report: &mut ViolationReport) {
        for (field, field_diff) in &resource.fields {
            for rule in self.registry.field_rules() {
                for message in rule.messages(&resource.name, field, field_diff, resource) {
                    self.record(
                        report,
                        Violation {
                            rule: rule.identifier().to_string(),
                            resource: resource.name.clone(),
                            field: field.clone(),
                            message,
                        },
                    );
                }
            }
        }

        for rule in self.registry.resource_rules() {
            for finding in rule.findings(resource) {
                self.record(
                    report,
                    Violation {
                        rule: rule.identifier().to_string(),
                        resource: resource.name.clone(),
                        field: finding.field,
                        message: finding.message,
                    },
                );
            }
        }
    }

    fn record(&self, report: &mut ViolationReport, violation: Violation) {
        if self.allowlist.allows(&violation) {
            tracing::debug!(
                rule = %violation.rule,
                resource = %violation.resource,
                field = %violation.field,
                "violation allow-listed"
            );
            report.suppressed += 1;
            return;
        }

        tracing::debug!(
            rule = %violation.rule,
            resource = %violation.resource,
            field = %violation.field,
            "rule fired"
        );
        report.violations.push(violation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_rules::{FieldDefaultModification, FieldGrowingMin};
    use diff_processor_common::{AllowEntry, FieldSchema, ResourceSchema, ValueType};

    fn snapshot(field: FieldSchema) -> ProviderSchema {
        ProviderSchema::new().with_resource("widget", ResourceSchema::new().with_field("size", field))
    }

    #[test]
    fn test_rules_are_not_deduplicated() {
        let old = snapshot(FieldSchema::new(ValueType::List).with_min_items(1).with_default("a"));
        let new = snapshot(FieldSchema::new(ValueType::List).with_min_items(2).with_default("b"));

        let report = Engine::new(RuleRegistry::builtin()).check(&old, &new).unwrap();
        let rules: Vec<&str> = report.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["field-changing-default-value", "field-growing-min"]);
    }

    #[test]
    fn test_reduced_registry() {
        let old = snapshot(FieldSchema::new(ValueType::List).with_min_items(1).with_default("a"));
        let new = snapshot(FieldSchema::new(ValueType::List).with_min_items(2).with_default("b"));

        let engine = Engine::new(RuleRegistry::empty().with_field_rule(FieldGrowingMin));
        let report = engine.check(&old, &new).unwrap();
        assert_eq!(report.messages(), vec!["Field `size` MinItems went from 1 to 2 on `widget`"]);
    }

    #[test]
    fn test_rule_order_follows_registry() {
        let old = snapshot(FieldSchema::new(ValueType::List).with_min_items(1).with_default("a"));
        let new = snapshot(FieldSchema::new(ValueType::List).with_min_items(2).with_default("b"));

        let engine = Engine::new(
            RuleRegistry::empty()
                .with_field_rule(FieldGrowingMin)
                .with_field_rule(FieldDefaultModification),
        );
        let report = engine.check(&old, &new).unwrap();
        let rules: Vec<&str> = report.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["field-growing-min", "field-changing-default-value"]);
    }

    #[test]
    fn test_allowlist_suppresses() {
        let old = snapshot(FieldSchema::new(ValueType::List).with_min_items(1).with_default("a"));
        let new = snapshot(FieldSchema::new(ValueType::List).with_min_items(2).with_default("b"));

        let allowlist = Allowlist::compile(&[AllowEntry {
            rule: "field-growing-min".to_string(),
            resource: "widget".to_string(),
            field: Some("size".to_string()),
            reason: Some("accepted".to_string()),
        }])
        .unwrap();

        let report = Engine::new(RuleRegistry::builtin())
            .with_allowlist(allowlist)
            .check(&old, &new)
            .unwrap();
        assert_eq!(report.suppressed, 1);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule, "field-changing-default-value");
    }

    #[test]
    fn test_resource_presence_is_informational() {
        let old = ProviderSchema::new().with_resource(
            "google_legacy",
            ResourceSchema::new().with_field("name", FieldSchema::new(ValueType::String).required()),
        );
        let new = ProviderSchema::new().with_resource(
            "google_gadget",
            ResourceSchema::new().with_field("name", FieldSchema::new(ValueType::String).required()),
        );

        let report = Engine::new(RuleRegistry::builtin()).check(&old, &new).unwrap();
        assert!(report.is_clean());
        assert_eq!(
            report.resource_changes,
            vec![
                ResourceChange {
                    resource: "google_gadget".to_string(),
                    kind: ChangeKind::Added,
                },
                ResourceChange {
                    resource: "google_legacy".to_string(),
                    kind: ChangeKind::Removed,
                },
            ]
        );
    }
}
