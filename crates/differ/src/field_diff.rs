//! Before/after pair for a single field path

use diff_processor_common::FieldSchema;

/// Old and new schema of one field path within one resource
///
/// At least one side is always present: a missing old side means the field
/// was added, a missing new side means it was removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDiff<'a> {
    old: Option<&'a FieldSchema>,
    new: Option<&'a FieldSchema>,
}

impl<'a> FieldDiff<'a> {
    /// Pair two sides of a field, `None` when both are absent
    pub fn new(old: Option<&'a FieldSchema>, new: Option<&'a FieldSchema>) -> Option<Self> {
        if old.is_none() && new.is_none() {
            return None;
        }
        Some(Self { old, new })
    }

    pub fn old_schema(&self) -> Option<&'a FieldSchema> {
        self.old
    }

    pub fn new_schema(&self) -> Option<&'a FieldSchema> {
        self.new
    }

    /// Both sides, when the field exists in both versions
    pub fn both(&self) -> Option<(&'a FieldSchema, &'a FieldSchema)> {
        self.old.zip(self.new)
    }

    pub fn is_added(&self) -> bool {
        self.old.is_none()
    }

    pub fn is_removed(&self) -> bool {
        self.new.is_none()
    }

    /// Whether the two sides differ in any attribute
    pub fn is_changed(&self) -> bool {
        self.old != self.new
    }
}
