//! Template loading and management

use crate::{ReportError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("rule_link", rule_link_filter);

    tera.add_raw_template(
        "breaking_changes.md",
        include_str!("../templates/breaking_changes.md.tera"),
    )
    .map_err(|e| {
        ReportError::Render(format!("Failed to load breaking_changes.md template: {}", e))
    })?;

    Ok(tera)
}

/// Filter turning a rule identifier into an anchor into the rule reference
fn rule_link_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let rule = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("rule_link filter expects a string"))?;

    Ok(Value::String(format!("[`{}`](#{})", rule, rule)))
}
