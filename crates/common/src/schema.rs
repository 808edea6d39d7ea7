//! In-memory resource schema model
//!
//! A `ProviderSchema` is a read-only snapshot of every resource a provider
//! version exposes. Field trees mirror the Terraform plugin SDK schema: a
//! value type, the required/optional/computed flags, defaults, item bounds
//! and an optional element that is either a typed element schema or a
//! nested block of further fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    List,
    Set,
    Map,
}

impl ValueType {
    /// Whether values of this type hold elements
    pub fn is_collection(self) -> bool {
        matches!(self, ValueType::List | ValueType::Set | ValueType::Map)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "TypeBool"),
            ValueType::Int => write!(f, "TypeInt"),
            ValueType::Float => write!(f, "TypeFloat"),
            ValueType::String => write!(f, "TypeString"),
            ValueType::List => write!(f, "TypeList"),
            ValueType::Set => write!(f, "TypeSet"),
            ValueType::Map => write!(f, "TypeMap"),
        }
    }
}

/// Default value attached to a field
///
/// An absent default is modelled as `Option::None` on the field, so an empty
/// string default stays distinguishable from no default at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl DefaultValue {
    /// Whether this is the empty string default
    pub fn is_empty_string(&self) -> bool {
        matches!(self, DefaultValue::String(s) if s.is_empty())
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "{}", b),
            DefaultValue::Int(i) => write!(f, "{}", i),
            DefaultValue::Float(x) => write!(f, "{}", x),
            DefaultValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::String(value.to_string())
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Int(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

/// Element of a collection field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldElem {
    /// Typed element (e.g. the `string` in a list of strings)
    Schema(Box<FieldSchema>),
    /// Nested block with its own named fields
    Block(BTreeMap<String, FieldSchema>),
}

/// Schema of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub value_type: ValueType,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub computed: bool,

    /// Changing the value forces the resource to be replaced
    #[serde(default, skip_serializing_if = "is_false")]
    pub force_new: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    /// Minimum number of items (0 = unset)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub min_items: u32,

    /// Maximum number of items (0 = unset)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_items: u32,

    /// A value-equivalence suppressor is attached to the field
    #[serde(default, skip_serializing_if = "is_false")]
    pub diff_suppressed: bool,

    /// Written as a single-key map (`block:` or `schema:`) in YAML
    #[serde(
        default,
        with = "serde_yaml::with::singleton_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub elem: Option<FieldElem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl FieldSchema {
    /// Create a field of the given type with every flag unset
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            default: None,
            min_items: 0,
            max_items: 0,
            diff_suppressed: false,
            elem: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn diff_suppressed(mut self) -> Self {
        self.diff_suppressed = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_min_items(mut self, min_items: u32) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    /// Attach a typed element schema
    pub fn with_elem_type(mut self, elem: FieldSchema) -> Self {
        self.elem = Some(FieldElem::Schema(Box::new(elem)));
        self
    }

    /// Attach a nested block
    pub fn with_block<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldSchema)>,
        S: Into<String>,
    {
        self.elem = Some(FieldElem::Block(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ));
        self
    }

    /// Computed and not settable by the user
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional
    }

    /// Settable by the user, filled in by the provider when unset
    pub fn is_optional_computed(&self) -> bool {
        self.computed && self.optional
    }

    /// Type of a typed collection's element, if any
    pub fn elem_type(&self) -> Option<ValueType> {
        match &self.elem {
            Some(FieldElem::Schema(elem)) => Some(elem.value_type),
            _ => None,
        }
    }

    /// Fields of a nested block, if this field is one
    pub fn block(&self) -> Option<&BTreeMap<String, FieldSchema>> {
        match &self.elem {
            Some(FieldElem::Block(fields)) => Some(fields),
            _ => None,
        }
    }
}

/// Schema of a single resource type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSchema>,
}

impl ResourceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

/// Every resource schema exposed by one provider version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchema {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceSchema>,
}

impl ProviderSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: impl Into<String>, resource: ResourceSchema) -> Self {
        self.resources.insert(name.into(), resource);
        self
    }

    /// Look up a resource by type name
    pub fn resource(&self, name: &str) -> Option<&ResourceSchema> {
        self.resources.get(name)
    }
}
