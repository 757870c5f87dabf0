//! AIP lint CLI
//!
//! Command-line interface for reviewing and fixing OpenAPI specs against
//! AIP-derived design rules.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use aip_lint::{
    load_spec, Category, Finding, FixOptions, Fixer, ReviewConfig, ReviewResult, Reviewer, Rule,
    RuleRegistry, Severity,
};

#[derive(Parser)]
#[command(name = "aip-lint")]
#[command(about = "Review OpenAPI specs against AIP-derived design rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a spec and report findings
    Review {
        /// Dereferenced OpenAPI document (JSON)
        spec: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only run rules in these categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Skip rules by id (repeatable)
        #[arg(long = "skip-rule")]
        skip_rules: Vec<String>,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// Apply available fixes and print the fixed document
    Fix {
        /// Dereferenced OpenAPI document (JSON)
        spec: PathBuf,

        /// Report which fixes would apply without writing the document
        #[arg(long)]
        dry_run: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the rule catalog
    Rules {
        /// Only list rules in this category
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Review {
            spec,
            strict,
            categories,
            skip_rules,
            format,
            quiet,
        } => run_review(&spec, strict, categories, skip_rules, &format, quiet),

        Commands::Fix {
            spec,
            dry_run,
            output,
            pretty,
        } => run_fix(&spec, dry_run, output, pretty),

        Commands::Rules { category } => run_rules(category.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_review(
    spec_path: &PathBuf,
    strict: bool,
    categories: Vec<String>,
    skip_rules: Vec<String>,
    format: &str,
    quiet: bool,
) -> Result<(), u8> {
    let document = load_spec(spec_path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let config = ReviewConfig {
        strict,
        categories: categories.iter().filter_map(|c| Category::parse(c)).collect(),
        skip_rules,
    };

    let reviewer = Reviewer::new(RuleRegistry::builtin());
    let result = reviewer
        .review(&document, &spec_path.display().to_string(), &config)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            2u8
        })?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        print_review_text(&result, quiet);
    }

    if result.summary.errors == 0 {
        Ok(())
    } else {
        Err(1)
    }
}

fn print_review_text(result: &ReviewResult, quiet: bool) {
    if !quiet {
        println!("Reviewing {} ...\n", result.spec_path);
    }

    for finding in &result.findings {
        if quiet && finding.severity != Severity::Error {
            continue;
        }
        println!(
            "  {}{}\x1b[0m[{}]: {} - {}",
            severity_color(finding.severity),
            severity_label(finding.severity),
            finding.rule_id,
            finding.path,
            finding.message
        );
        if !quiet {
            if let Some(suggestion) = &finding.suggestion {
                println!("      hint: {}", suggestion);
            }
        }
    }

    println!();
    let summary = &result.summary;
    if result.findings.is_empty() {
        println!(
            "\x1b[32m✓ {} rules applied, no findings\x1b[0m",
            result.metadata.rule_count
        );
    } else {
        let fixable = result.fixable().count();
        println!(
            "\x1b[31m✗ {} findings ({} errors, {} warnings, {} suggestions), {} fixable\x1b[0m",
            result.findings.len(),
            summary.errors,
            summary.warnings,
            summary.suggestions,
            fixable
        );
    }
}

fn run_fix(
    spec_path: &PathBuf,
    dry_run: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let document = load_spec(spec_path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let reviewer = Reviewer::new(RuleRegistry::builtin());
    let result = reviewer
        .review(&document, &spec_path.display().to_string(), &ReviewConfig::default())
        .map_err(|e| {
            eprintln!("Error: {}", e);
            2u8
        })?;

    let fixable: Vec<Finding> = result.fixable().cloned().collect();

    let mut fixer = Fixer::new(&document);
    let fix_results = fixer.apply_fixes(&fixable, &FixOptions { dry_run });
    let summary = fixer.summary();

    for fix_result in &fix_results {
        if !fix_result.applied {
            let reason = fix_result
                .changes
                .iter()
                .find_map(|c| c.error.as_deref())
                .unwrap_or("skipped");
            eprintln!("  \x1b[33m⚠\x1b[0m {}: {}", fix_result.rule_id, reason);
        }
    }
    eprintln!(
        "{} of {} fixes applied ({} changes){}",
        summary.applied,
        fixable.len(),
        summary.changes,
        if dry_run { " [dry run]" } else { "" }
    );

    let spec = fixer.into_spec();
    let json_output = if pretty {
        serde_json::to_string_pretty(&spec)
    } else {
        serde_json::to_string(&spec)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_rules(category: Option<&str>) -> Result<(), u8> {
    let registry = RuleRegistry::builtin();

    let rules: Vec<&Rule> = match category {
        Some(name) => match Category::parse(name) {
            Some(category) => registry.by_category(category).collect(),
            None => {
                eprintln!("Error: unknown category: {}", name);
                return Err(2);
            }
        },
        None => registry.rules().iter().collect(),
    };

    for rule in rules {
        println!(
            "  {:<28} {:<13} {}{:<10}\x1b[0m {}",
            rule.id,
            rule.category.as_str(),
            severity_color(rule.severity),
            severity_label(rule.severity),
            rule.description
        );
    }

    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Suggestion => "suggestion",
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Suggestion => "\x1b[36m",
    }
}
