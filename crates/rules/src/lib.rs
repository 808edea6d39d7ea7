//! Breaking-change rules for provider resource schemas
//!
//! Evaluates a `SchemaDiff` against an ordered registry of independent,
//! stateless rules and collects the messages they emit into a
//! `ViolationReport`.
//!
//! # Examples
//!
//! ```
//! use diff_processor_common::{FieldSchema, ProviderSchema, ResourceSchema, ValueType};
//! use diff_processor_rules::{Engine, RuleRegistry};
//!
//! let old = ProviderSchema::new().with_resource(
//!     "widget",
//!     ResourceSchema::new().with_field("size", FieldSchema::new(ValueType::Int).optional().computed()),
//! );
//! let new = ProviderSchema::new().with_resource(
//!     "widget",
//!     ResourceSchema::new().with_field("size", FieldSchema::new(ValueType::Int).optional()),
//! );
//!
//! let report = Engine::new(RuleRegistry::builtin()).check(&old, &new).unwrap();
//! assert_eq!(report.violations.len(), 1);
//! assert_eq!(report.violations[0].rule, "field-oc-to-c");
//! ```

mod allowlist;
mod engine;
pub mod field_rules;
mod registry;
mod report;
pub mod resource_rules;
mod rule;

pub use allowlist::Allowlist;
pub use engine::Engine;
pub use registry::RuleRegistry;
pub use report::{ChangeKind, ResourceChange, Violation, ViolationReport};
pub use rule::{FieldRule, ResourceFinding, ResourceRule};

use diff_processor_differ::DiffError;
use thiserror::Error;

/// Errors that can occur while configuring or running the rule engine
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Unknown rule identifier: {0}")]
    UnknownRule(String),

    #[error("Invalid resource pattern `{pattern}` in allow-list: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Schema diff failed: {0}")]
    Diff(#[from] DiffError),
}

pub type Result<T> = std::result::Result<T, RuleError>;
