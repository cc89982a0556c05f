//! Combine command - merge every spec file under the given paths into one schema file.

use super::report_fault;
use crate::config::{BridgeschemaConfig, TargetPlatform};
use crate::discover::{SpecFilter, discover_spec_files};
use anyhow::Context;
use bridgeschema_modules::{FileError, SchemaSet, parse_files};
use clap::Args;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Combine command arguments
#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    /// Output JSON file
    pub outfile: PathBuf,

    /// Spec files or directories to search
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Only include platform-specific files for this platform
    #[arg(long)]
    pub platform: Option<TargetPlatform>,

    /// Skip spec files whose path matches this regex
    #[arg(long)]
    pub exclude: Option<String>,

    /// Config file (default: bridgeschema.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// What a combine run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    pub files: usize,
    pub modules: usize,
    pub warnings: usize,
    pub failures: usize,
}

/// Discover, parse and merge spec files, then write `args.outfile`.
///
/// Modules that built are written even when other files failed; failures are
/// counted in the summary.
pub fn combine(args: &CombineArgs, config_dir: &Path) -> anyhow::Result<CombineSummary> {
    let config = BridgeschemaConfig::resolve(args.config.as_deref(), config_dir)?.combine;

    let exclude = match args.exclude.as_ref().or(config.exclude.as_ref()) {
        Some(pattern) => Some(
            Regex::new(pattern).with_context(|| format!("invalid exclude pattern {pattern:?}"))?,
        ),
        None => None,
    };
    let filter = SpecFilter {
        platform: args.platform.or(config.platform),
        exclude,
    };
    let pretty = !args.compact && config.pretty();

    let files = discover_spec_files(&args.paths, &filter);
    tracing::info!(count = files.len(), "parsing spec files");

    let reports = parse_files(&files);
    let mut summary = CombineSummary {
        files: files.len(),
        ..Default::default()
    };
    for report in &reports {
        match &report.outcome {
            Ok(Some(parse)) => {
                for error in &parse.errors {
                    report_fault(&report.path, error, "warning");
                }
                summary.warnings += parse.errors.len();
            }
            Ok(None) => {}
            Err(FileError::Parser(error)) => {
                report_fault(&report.path, error, "error");
                summary.failures += 1;
            }
            Err(e) => {
                eprintln!("{}: error: {}", report.path.display(), e);
                summary.failures += 1;
            }
        }
    }

    let set = SchemaSet::from_reports(&reports);
    summary.modules = set.modules.len();
    let json = set.to_json(pretty).context("failed to serialize schema")?;

    if let Some(parent) = args.outfile.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&args.outfile, json)
        .with_context(|| format!("failed to write {}", args.outfile.display()))?;
    tracing::info!(
        modules = summary.modules,
        path = %args.outfile.display(),
        "wrote combined schema"
    );

    Ok(summary)
}

/// Run the combine command
pub fn run(args: CombineArgs) -> i32 {
    let config_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: failed to read working directory: {}", e);
            return 1;
        }
    };
    match combine(&args, &config_dir) {
        Ok(summary) if summary.failures > 0 => 1,
        Ok(_) => 0,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}
