//! Rule capabilities evaluated by the engine

use diff_processor_differ::{FieldDiff, ResourceDiff, ResourceDiffContext};

/// A policy over a single field's before/after pair
///
/// Implementations hold no mutable state and must return the same messages
/// for the same input. A rule that cannot judge a diff shape (for example an
/// added field when it compares both sides) returns no messages.
pub trait FieldRule: Send + Sync {
    /// Stable identifier used for skipping and allow-listing
    fn identifier(&self) -> &'static str;

    /// One-line summary shown when listing rules
    fn description(&self) -> &'static str;

    fn messages(
        &self,
        resource: &str,
        field: &str,
        diff: &FieldDiff<'_>,
        context: &dyn ResourceDiffContext,
    ) -> Vec<String>;
}

/// A message produced by a resource rule, attributed to a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFinding {
    pub field: String,
    pub message: String,
}

/// A policy that needs the whole resource diff rather than one field
pub trait ResourceRule: Send + Sync {
    /// Stable identifier used for skipping and allow-listing
    fn identifier(&self) -> &'static str;

    /// One-line summary shown when listing rules
    fn description(&self) -> &'static str;

    fn findings(&self, diff: &ResourceDiff<'_>) -> Vec<ResourceFinding>;
}
