mod cli;
mod color;
mod fetch;
mod render;
mod source;

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use fetch::{clear_cache, load_source};
use rustdoc_index::{
    DocTree, Finding, ImplementorTable, Script, ScriptKind, Severity, SidebarItems,
    check_implementors, check_sidebar, parse_script,
};
use serde::Serialize;
use thiserror::Error;

/// A failed run. `output` is what still belongs on stdout, such as a check
/// report that found errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    pub output: String,
    pub message: String,
}

/// `check` found error-level problems. The report is complete.
#[derive(Debug, Error)]
#[error("check failed")]
struct CheckFailed {
    report: String,
}

/// Run the CLI with the given arguments and return the output as a string.
///
/// # Arguments
/// * `args` - Command line arguments (excluding program name)
///
/// # Returns
/// * `Ok(String)` - Successful output (stdout)
/// * `Err(CliError)` - Output for stdout, if any, and the error message (stderr)
pub fn run_cli(args: &[&str]) -> Result<String, CliError> {
    run_cli_impl(args).map_err(|e| match e.downcast::<CheckFailed>() {
        Ok(failed) => CliError {
            message: failed.to_string(),
            output: failed.report,
        },
        Err(e) => CliError {
            output: String::new(),
            message: format!("{:#}", e),
        },
    })
}

fn run_cli_impl(args: &[&str]) -> anyhow::Result<String> {
    let parsed_args =
        match Cli::try_parse_from(std::iter::once("docindex").chain(args.iter().copied())) {
            Ok(args) => args,
            Err(e) => {
                // Handle --help and --version as successful outputs
                if e.kind() == clap::error::ErrorKind::DisplayHelp
                    || e.kind() == clap::error::ErrorKind::DisplayVersion
                {
                    return Ok(e.to_string());
                }
                return Err(e.into());
            }
        };

    parsed_args.color.apply();

    if parsed_args.clear_cache {
        return Ok(if clear_cache()? {
            "Cache cleared successfully\n".to_string()
        } else {
            "Cache directory does not exist\n".to_string()
        });
    }

    let command = parsed_args
        .command
        .ok_or_else(|| anyhow::anyhow!("Missing command, see --help"))?;
    let use_cache = !parsed_args.no_cache;

    match command {
        Commands::Show { source } => {
            let src = load_source(&source, use_cache)?;
            let script = parse_script(&src).with_context(|| format!("Failed to parse {source}"))?;
            Ok(render::format_script(&script))
        }
        Commands::Json { source } => {
            let src = load_source(&source, use_cache)?;
            let script = parse_script(&src).with_context(|| format!("Failed to parse {source}"))?;
            Ok(serde_json::to_string_pretty(&script)? + "\n")
        }
        Commands::Emit { input, kind } => emit(&input, kind),
        Commands::Check { path, json } => check(&path, json),
        Commands::Impls { dir, type_path } => impls(&dir, &type_path),
    }
}

fn emit(input: &Path, kind: Option<ScriptKind>) -> anyhow::Result<String> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let script = match kind {
        None => serde_json::from_str::<Script>(&json)?,
        Some(ScriptKind::Implementors) => {
            Script::Implementors(serde_json::from_str::<ImplementorTable>(&json)?)
        }
        Some(ScriptKind::Sidebar) => Script::Sidebar(serde_json::from_str::<SidebarItems>(&json)?),
    };
    Ok(script.to_script()? + "\n")
}

#[derive(Serialize)]
struct FileReport {
    path: String,
    kind: Option<&'static str>,
    findings: Vec<Finding>,
    /// Set when the file could not be parsed.
    error: Option<String>,
}

impl FileReport {
    fn parsed(path: String, script: &Script) -> Self {
        let findings = match script {
            Script::Implementors(table) => check_implementors(table),
            Script::Sidebar(items) => check_sidebar(items),
        };
        Self {
            path,
            kind: Some(script.kind().as_str()),
            findings,
            error: None,
        }
    }

    fn failed(path: String, error: String) -> Self {
        Self {
            path,
            kind: None,
            findings: Vec::new(),
            error: Some(error),
        }
    }

    fn error_count(&self) -> usize {
        usize::from(self.error.is_some())
            + self
                .findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count()
    }

    fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }
}

fn check(path: &Path, json: bool) -> anyhow::Result<String> {
    let reports = if path.is_dir() {
        let tree = DocTree::load(path)?;
        let mut reports: Vec<FileReport> = tree
            .files
            .iter()
            .map(|file| FileReport::parsed(file.path.display().to_string(), &file.script))
            .collect();
        reports.extend(tree.failures.iter().map(|(rel, e)| {
            FileReport::failed(rel.display().to_string(), e.to_string())
        }));
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        reports
    } else {
        let src = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path.display().to_string();
        vec![match parse_script(&src) {
            Ok(script) => FileReport::parsed(name, &script),
            Err(e) => FileReport::failed(name, e.to_string()),
        }]
    };

    let errors: usize = reports.iter().map(FileReport::error_count).sum();
    let warnings: usize = reports.iter().map(FileReport::warning_count).sum();

    let output = if json {
        serde_json::to_string_pretty(&reports)? + "\n"
    } else {
        let mut output = String::new();
        for report in &reports {
            let status = if report.error_count() > 0 {
                "FAIL".red().bold()
            } else {
                "ok".green()
            };
            output.push_str(&format!("{} {}\n", status, report.path));
            if let Some(error) = &report.error {
                output.push_str(&format!("  {}: {}\n", "error".red().bold(), error));
            }
            for finding in &report.findings {
                output.push_str(&render::format_finding(finding));
            }
        }
        output.push_str(&format!(
            "{} files checked, {} errors, {} warnings\n",
            reports.len(),
            errors,
            warnings
        ));
        output
    };

    if errors > 0 {
        return Err(CheckFailed { report: output }.into());
    }
    Ok(output)
}

fn impls(dir: &Path, type_path: &str) -> anyhow::Result<String> {
    let tree = DocTree::load(dir)?;
    let found = tree.traits_implemented_by(type_path);

    if found.is_empty() {
        return Ok(format!("No documented trait implementations found for {type_path}\n"));
    }

    let mut output = format!("{} implements:\n", type_path.bright_white().bold());
    for (trait_path, krate, entry) in found {
        let auto = if entry.synthetic {
            format!(" {}", "(auto)".bright_black())
        } else {
            String::new()
        };
        output.push_str(&format!(
            "  {} {}{}  {}\n",
            "•".bright_blue(),
            trait_path.bright_cyan(),
            auto,
            format!("({krate})").dimmed()
        ));
    }
    Ok(output)
}
