//! Diff Processor CLI
//!
//! Command-line interface for detecting breaking changes between two
//! snapshots of a provider's resource schemas.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use diff_processor_common::{DiffConfig, FieldSchema, ProviderSchema};
use diff_processor_differ::{compute_schema_diff, ResourceDiff};
use diff_processor_reporter::{exit_code, OutputFormat, Reporter};
use diff_processor_rules::field_rules::format_default_value;
use diff_processor_rules::{Allowlist, Engine, RuleRegistry};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diff-processor")]
#[command(version, about = "Detect breaking changes between two provider schema snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report breaking changes between an old and a new schema snapshot
    #[command(after_help = "EXAMPLES:\n  \
        # Compare two snapshot files\n  \
        diff-processor breaking-changes --old old.yaml --new new.yaml\n\n  \
        # Compare snapshot directories and render a PR comment\n  \
        diff-processor breaking-changes --old ./old --new ./new --format markdown\n\n  \
        # Accept known changes and skip a rule\n  \
        diff-processor breaking-changes \\\n    \
        --old old.yaml \\\n    \
        --new new.yaml \\\n    \
        --config diff-processor.yaml \\\n    \
        --skip-rule field-growing-min")]
    BreakingChanges {
        /// Snapshot of the schema before the change (file or directory)
        #[arg(long)]
        old: PathBuf,

        /// Snapshot of the schema after the change (file or directory)
        #[arg(long)]
        new: PathBuf,

        /// Run configuration with skipped rules and allow-listed violations
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rule identifier to skip (repeatable)
        #[arg(long = "skip-rule")]
        skip_rules: Vec<String>,

        /// Output format
        #[arg(short, long, default_value_t = Format::Text)]
        format: Format,
    },

    /// List the breaking-change rules in evaluation order
    Rules,

    /// Print the structural diff between two schema snapshots
    Diff {
        /// Snapshot of the schema before the change (file or directory)
        #[arg(long)]
        old: PathBuf,

        /// Snapshot of the schema after the change (file or directory)
        #[arg(long)]
        new: PathBuf,

        /// Only show this resource
        #[arg(short, long)]
        resource: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Colored, grouped by resource
    Text,
    /// Machine-readable report
    Json,
    /// Pull request comment
    Markdown,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Json => write!(f, "json"),
            Format::Markdown => write!(f, "markdown"),
        }
    }
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::BreakingChanges {
            old,
            new,
            config,
            skip_rules,
            format,
        } => breaking_changes_command(CheckConfig {
            old: old.as_path(),
            new: new.as_path(),
            config: config.as_deref(),
            skip_rules,
            format,
            verbose: cli.verbose,
        }),
        Commands::Rules => rules_command(cli.verbose).map(|_| ExitCode::SUCCESS),
        Commands::Diff { old, new, resource } => {
            diff_command(old.as_path(), new.as_path(), resource.as_deref())
                .map(|_| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "✗ Error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr so report output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Arguments of the breaking-changes command
struct CheckConfig<'a> {
    old: &'a Path,
    new: &'a Path,
    config: Option<&'a Path>,
    skip_rules: Vec<String>,
    format: Format,
    verbose: bool,
}

fn breaking_changes_command(args: CheckConfig) -> Result<ExitCode> {
    // Progress lines would corrupt machine-readable output
    let progress = args.verbose && matches!(args.format, Format::Text);

    let config = match args.config {
        Some(path) => {
            if progress {
                println!("{} Loading config: {}", "→".cyan(), path.display());
            }
            DiffConfig::load(path).context("Failed to load run configuration")?
        }
        None => DiffConfig::default(),
    }
    .skip_rules_from(args.skip_rules);

    let registry = RuleRegistry::builtin()
        .without(&config.skip_rules)
        .context("Invalid skipped rule")?;

    let allowlist = Allowlist::compile(&config.allow).context("Invalid allow-list")?;
    let known = RuleRegistry::builtin();
    for rule in allowlist.rules() {
        if !known.contains(rule) {
            tracing::warn!(rule, "allow-list entry references an unknown rule");
        }
    }

    let old = load_snapshot(args.old, "old", progress)?;
    let new = load_snapshot(args.new, "new", progress)?;

    if progress {
        println!(
            "{} Checking {} rules against {} resources",
            "→".cyan(),
            registry.len(),
            new.resources.len()
        );
    }

    let engine = Engine::new(registry).with_allowlist(allowlist);
    let report = engine
        .check(&old, &new)
        .context("Failed to diff schema snapshots")?;

    let reporter = Reporter::new().context("Failed to create reporter")?;
    let rendered = reporter
        .render(&report, args.format.into())
        .context("Failed to render report")?;

    match args.format {
        Format::Text => {
            print!("{}", rendered);
            if rendered.is_empty() && args.verbose {
                println!("{} No breaking changes detected", "✓".green());
            }
        }
        Format::Json | Format::Markdown => println!("{}", rendered.trim_end()),
    }

    Ok(ExitCode::from(exit_code(&report)))
}

fn load_snapshot(path: &Path, label: &str, progress: bool) -> Result<ProviderSchema> {
    if progress {
        println!(
            "{} Loading {} snapshot: {}",
            "→".cyan(),
            label,
            path.display()
        );
    }

    let schema = ProviderSchema::load(path)
        .with_context(|| format!("Failed to load {} snapshot {}", label, path.display()))?;

    if progress {
        println!(
            "{} Loaded {} resources",
            "✓".green(),
            schema.resources.len()
        );
    }

    Ok(schema)
}

fn rules_command(verbose: bool) -> Result<()> {
    let registry = RuleRegistry::builtin();

    if verbose {
        println!(
            "{} {} rules in evaluation order",
            "→".cyan(),
            registry.len()
        );
    }

    for (identifier, description) in registry.descriptions() {
        println!("{:<40} {}", identifier.cyan(), description);
    }

    Ok(())
}

fn diff_command(old_path: &Path, new_path: &Path, resource: Option<&str>) -> Result<()> {
    let old = ProviderSchema::load(old_path)
        .with_context(|| format!("Failed to load old snapshot {}", old_path.display()))?;
    let new = ProviderSchema::load(new_path)
        .with_context(|| format!("Failed to load new snapshot {}", new_path.display()))?;

    let diff = compute_schema_diff(&old, &new).context("Failed to diff schema snapshots")?;

    let selected: Vec<&ResourceDiff<'_>> = match resource {
        Some(name) => match diff.resource(name) {
            Some(resource_diff) => vec![resource_diff],
            None => bail!("Resource `{}` not found in either snapshot", name),
        },
        None => diff.resources.values().collect(),
    };

    let mut printed = 0;
    for resource_diff in selected.into_iter().filter(|d| d.is_changed()) {
        if printed > 0 {
            println!();
        }
        print_resource_diff(resource_diff);
        printed += 1;
    }

    if printed == 0 {
        println!("{} No schema differences", "✓".green());
    }

    Ok(())
}

fn print_resource_diff(diff: &ResourceDiff<'_>) {
    match (diff.old, diff.new) {
        (None, Some(_)) => println!("{} {}", "+".green(), diff.name.bold()),
        (Some(_), None) => println!("{} {}", "-".red(), diff.name.bold()),
        _ => println!("{} {}", "~".yellow(), diff.name.bold()),
    }

    for block in &diff.added_blocks {
        println!("  {} block {}", "+".green(), block);
    }
    for block in &diff.removed_blocks {
        println!("  {} block {}", "-".red(), block);
    }

    for (path, field) in diff.changed_fields() {
        match field.both() {
            Some((old, new)) => println!(
                "  {} {} ({})",
                "~".yellow(),
                path,
                describe_change(old, new).join(", ")
            ),
            None if field.is_added() => println!("  {} {}", "+".green(), path),
            None => println!("  {} {}", "-".red(), path),
        }
    }
}

/// Attributes that differ between two versions of a field
fn describe_change(old: &FieldSchema, new: &FieldSchema) -> Vec<String> {
    let mut changes = Vec::new();

    if old.value_type != new.value_type || old.elem_type() != new.elem_type() {
        changes.push(format!(
            "type {} → {}",
            type_label(old),
            type_label(new)
        ));
    }

    let flags = [
        ("required", old.required, new.required),
        ("optional", old.optional, new.optional),
        ("computed", old.computed, new.computed),
        ("force_new", old.force_new, new.force_new),
        ("diff_suppressed", old.diff_suppressed, new.diff_suppressed),
    ];
    for (name, before, after) in flags {
        if before != after {
            changes.push(format!("{} {} → {}", name, before, after));
        }
    }

    if old.default != new.default {
        changes.push(format!(
            "default {} → {}",
            format_default_value(old.default.as_ref()),
            format_default_value(new.default.as_ref())
        ));
    }
    if old.min_items != new.min_items {
        changes.push(format!("min_items {} → {}", old.min_items, new.min_items));
    }
    if old.max_items != new.max_items {
        changes.push(format!("max_items {} → {}", old.max_items, new.max_items));
    }
    if changes.is_empty() {
        let label = if old.elem != new.elem {
            "nested schema"
        } else {
            "description"
        };
        changes.push(label.to_string());
    }

    changes
}

fn type_label(field: &FieldSchema) -> String {
    match field.elem_type() {
        Some(elem) => format!("{}.{}", field.value_type, elem),
        None => field.value_type.to_string(),
    }
}
