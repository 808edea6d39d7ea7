//! Ordered rule registry handed to the engine

use crate::field_rules::{
    FieldBecomingComputedOnly, FieldBecomingRequired, FieldChangingType,
    FieldDefaultModification, FieldGrowingMin, FieldNewOptionalFieldWithDefault,
    FieldNewRequired, FieldOptionalComputedToOptional, FieldRemovingDiffSuppress,
    FieldShrinkingMax,
};
use crate::resource_rules::FieldRemovalOrRename;
use crate::{FieldRule, ResourceRule, Result, RuleError};

/// The set of rules an engine evaluates, in evaluation order
///
/// Built once at startup and never mutated afterwards. Tests build reduced
/// registries with `empty` and the `with_*` builders.
pub struct RuleRegistry {
    field_rules: Vec<Box<dyn FieldRule>>,
    resource_rules: Vec<Box<dyn ResourceRule>>,
}

impl RuleRegistry {
    /// Registry without any rules
    pub fn empty() -> Self {
        Self {
            field_rules: Vec::new(),
            resource_rules: Vec::new(),
        }
    }

    /// Every built-in rule
    pub fn builtin() -> Self {
        Self::empty()
            .with_field_rule(FieldChangingType)
            .with_field_rule(FieldNewRequired)
            .with_field_rule(FieldNewOptionalFieldWithDefault)
            .with_field_rule(FieldBecomingRequired)
            .with_field_rule(FieldBecomingComputedOnly)
            .with_field_rule(FieldOptionalComputedToOptional)
            .with_field_rule(FieldDefaultModification)
            .with_field_rule(FieldGrowingMin)
            .with_field_rule(FieldShrinkingMax)
            .with_field_rule(FieldRemovingDiffSuppress)
            .with_resource_rule(FieldRemovalOrRename)
    }

    pub fn with_field_rule(mut self, rule: impl FieldRule + 'static) -> Self {
        self.field_rules.push(Box::new(rule));
        self
    }

    pub fn with_resource_rule(mut self, rule: impl ResourceRule + 'static) -> Self {
        self.resource_rules.push(Box::new(rule));
        self
    }

    /// Drop the rules with the given identifiers
    ///
    /// Fails on an identifier that names no rule in this registry, so a typo
    /// never silently leaves a rule active.
    pub fn without<S: AsRef<str>>(mut self, identifiers: &[S]) -> Result<Self> {
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            if !self.contains(identifier) {
                return Err(RuleError::UnknownRule(identifier.to_string()));
            }
        }

        let skipped = |id: &str| identifiers.iter().any(|s| s.as_ref() == id);
        self.field_rules.retain(|rule| !skipped(rule.identifier()));
        self.resource_rules.retain(|rule| !skipped(rule.identifier()));

        if !identifiers.is_empty() {
            tracing::debug!(
                skipped = identifiers.len(),
                remaining = self.len(),
                "filtered rule registry"
            );
        }

        Ok(self)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers().iter().any(|id| *id == identifier)
    }

    /// Identifiers in evaluation order: field rules first, then resource rules
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.descriptions().into_iter().map(|(id, _)| id).collect()
    }

    /// `(identifier, description)` pairs in evaluation order
    pub fn descriptions(&self) -> Vec<(&'static str, &'static str)> {
        self.field_rules
            .iter()
            .map(|rule| (rule.identifier(), rule.description()))
            .chain(
                self.resource_rules
                    .iter()
                    .map(|rule| (rule.identifier(), rule.description())),
            )
            .collect()
    }

    pub fn field_rules(&self) -> &[Box<dyn FieldRule>] {
        &self.field_rules
    }

    pub fn resource_rules(&self) -> &[Box<dyn ResourceRule>] {
        &self.resource_rules
    }

    pub fn len(&self) -> usize {
        self.field_rules.len() + self.resource_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
