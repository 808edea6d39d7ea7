//! Structural diff of provider resource schemas
//!
//! This crate walks two `ProviderSchema` snapshots (old and new) and
//! produces a `SchemaDiff`: for every resource present on either side, a
//! `ResourceDiff` holding one `FieldDiff` per flattened field path plus the
//! added/removed field and nested-block sets.
//!
//! ## Field paths
//!
//! Fields inside nested blocks are dot-qualified (`config.network.subnet`),
//! so a field in a new block never collides with a top-level field of the
//! same short name. Every collection is ordered, which keeps traversal and
//! therefore every report derived from it deterministic.
//!
//! ```
//! use diff_processor_common::{FieldSchema, ProviderSchema, ResourceSchema, ValueType};
//! use diff_processor_differ::compute_schema_diff;
//!
//! let old = ProviderSchema::new().with_resource(
//!     "google_widget",
//!     ResourceSchema::new().with_field("size", FieldSchema::new(ValueType::Int).optional()),
//! );
//! let new = ProviderSchema::new().with_resource(
//!     "google_widget",
//!     ResourceSchema::new().with_field("size", FieldSchema::new(ValueType::String).optional()),
//! );
//!
//! let diff = compute_schema_diff(&old, &new).unwrap();
//! assert!(diff.resource("google_widget").unwrap().fields["size"].is_changed());
//! ```

mod field_diff;
mod resource_diff;
mod schema_diff;

pub use field_diff::FieldDiff;
pub use resource_diff::{parent_path, ResourceDiff, ResourceDiffContext};
pub use schema_diff::{compute_schema_diff, SchemaDiff};

use thiserror::Error;

/// Errors raised when the differ's own output would be inconsistent
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiffError {
    #[error("Field `{field}` on `{resource}` has neither an old nor a new schema")]
    EmptyFieldDiff { resource: String, field: String },
}

/// Result type for diff operations
pub type Result<T> = std::result::Result<T, DiffError>;
