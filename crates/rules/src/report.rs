//! Violations collected by a rule evaluation pass

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A breaking change reported by one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: String,
    pub resource: String,
    pub field: String,
    pub message: String,
}

/// How a resource's presence changed between the snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
}

/// Informational note about a resource present on only one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceChange {
    pub resource: String,
    pub kind: ChangeKind,
}

impl fmt::Display for ResourceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChangeKind::Added => write!(f, "Resource `{}` was added", self.resource),
            ChangeKind::Removed => write!(f, "Resource `{}` was removed", self.resource),
        }
    }
}

/// Result of evaluating every rule against a schema diff
///
/// Violations are ordered by resource, then field path, then rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    pub violations: Vec<Violation>,
    pub resource_changes: Vec<ResourceChange>,
    /// Violations dropped by the allow-list
    pub suppressed: usize,
}

impl ViolationReport {
    /// No breaking change was found
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations grouped by resource name, each group in report order
    pub fn by_resource(&self) -> BTreeMap<&str, Vec<&Violation>> {
        let mut grouped: BTreeMap<&str, Vec<&Violation>> = BTreeMap::new();
        for violation in &self.violations {
            grouped
                .entry(violation.resource.as_str())
                .or_default()
                .push(violation);
        }
        grouped
    }

    /// Every violation message in report order
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    /// Violations raised by the given rule
    pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.rule == rule)
    }
}
