//! Rendering of breaking-change reports
//!
//! Reports can be written for a terminal, as JSON for tooling, or as a
//! Markdown comment suitable for a pull request.

mod templates;
mod text;

pub use text::render_text;

use diff_processor_rules::{Violation, ViolationReport};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

/// Errors raised while rendering a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Template error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

#[derive(Serialize)]
struct ResourceGroup<'a> {
    resource: &'a str,
    violations: Vec<&'a Violation>,
}

/// Renders reports in any [`OutputFormat`]
pub struct Reporter {
    tera: Tera,
}

impl Reporter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: templates::load_templates()?,
        })
    }

    pub fn render(&self, report: &ViolationReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => render_text(report),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Markdown => self.render_markdown(report),
        }
    }

    fn render_markdown(&self, report: &ViolationReport) -> Result<String> {
        let groups: Vec<ResourceGroup<'_>> = report
            .by_resource()
            .into_iter()
            .map(|(resource, violations)| ResourceGroup {
                resource,
                violations,
            })
            .collect();

        let mut context = Context::new();
        context.insert("violations_count", &report.violations.len());
        context.insert("groups", &groups);
        context.insert("resource_changes", &report.resource_changes);
        context.insert("suppressed", &report.suppressed);

        self.tera
            .render("breaking_changes.md", &context)
            .map_err(|e| ReportError::Render(format!("Failed to render Markdown report: {}", e)))
    }
}

/// Process exit code for a finished check: 0 when clean, 1 otherwise
pub fn exit_code(report: &ViolationReport) -> u8 {
    if report.is_clean() {
        0
    } else {
        1
    }
}
