//! Console rendering grouped by resource

use crate::Result;
use colored::*;
use diff_processor_rules::ViolationReport;
use std::fmt::Write as FmtWrite;

/// Render a report for terminal output
///
/// A report without violations, notes or suppressed entries renders as an
/// empty string.
pub fn render_text(report: &ViolationReport) -> Result<String> {
    let mut output = String::new();

    if !report.is_clean() {
        write_violations(&mut output, report)?;
    }

    if !report.resource_changes.is_empty() {
        if !output.is_empty() {
            writeln!(output)?;
        }
        for change in &report.resource_changes {
            writeln!(output, "{} {}", "ℹ".blue(), change)?;
        }
    }

    if !report.is_clean() || report.suppressed > 0 {
        if !output.is_empty() {
            writeln!(output)?;
        }
        write_summary(&mut output, report)?;
    }

    Ok(output)
}

fn write_violations(output: &mut String, report: &ViolationReport) -> Result<()> {
    let grouped = report.by_resource();

    writeln!(
        output,
        "{} Breaking changes detected in {} resource(s)",
        "✗".red().bold(),
        grouped.len()
    )?;

    for (resource, violations) in grouped {
        writeln!(output)?;
        writeln!(output, "{}", resource.bold())?;
        for violation in violations {
            writeln!(
                output,
                "  • {} {}",
                format!("[{}]", violation.rule).yellow(),
                violation.message
            )?;
        }
    }

    Ok(())
}

fn write_summary(output: &mut String, report: &ViolationReport) -> Result<()> {
    let count = report.violations.len();
    let mut summary = format!("{} violation{}", count, if count == 1 { "" } else { "s" });
    if report.suppressed > 0 {
        write!(summary, " ({} allow-listed)", report.suppressed)?;
    }

    if count == 0 {
        writeln!(output, "{} {}", "✓".green(), summary)?;
    } else {
        writeln!(output, "{}", summary.red())?;
    }
    Ok(())
}
