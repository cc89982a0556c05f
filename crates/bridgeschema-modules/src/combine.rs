//! Parsing many spec files and merging their schemas.

use crate::env::MODULE_BASE_INTERFACE;
use crate::error::ParserError;
use crate::input::{ReadError, read_typescript};
use crate::ir::NativeModuleSchema;
use crate::module::{ModuleParse, build_module_schema};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Why a file produced no schema.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Outcome of parsing one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub module_name: String,
    /// `Ok(None)` when the file does not declare a module.
    pub outcome: Result<Option<ModuleParse>, FileError>,
}

impl FileReport {
    pub fn parse(&self) -> Option<&ModuleParse> {
        self.outcome.as_ref().ok().and_then(Option::as_ref)
    }
}

/// Logical module name of a spec file: the file name without its extension
/// and platform segment (`NativeFoo.android.ts` -> `NativeFoo`).
pub fn module_name_from_path(path: &Path) -> String {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let stem = [".tsx", ".ts"]
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name);
    [".android", ".ios"]
        .iter()
        .find_map(|platform| stem.strip_suffix(platform))
        .unwrap_or(stem)
        .to_string()
}

/// Parse one spec source.
///
/// Sources that never mention the module base interface are not module specs
/// and yield `Ok(None)` without being parsed.
pub fn parse_module_source(
    module_name: &str,
    source: &str,
) -> Result<Option<ModuleParse>, FileError> {
    if !source.contains(MODULE_BASE_INTERFACE) {
        return Ok(None);
    }
    let program = read_typescript(source)?;
    Ok(Some(build_module_schema(module_name, &program)?))
}

pub fn parse_file(path: &Path) -> FileReport {
    let module_name = module_name_from_path(path);
    let outcome = std::fs::read_to_string(path)
        .map_err(FileError::from)
        .and_then(|source| parse_module_source(&module_name, &source));
    FileReport {
        path: path.to_path_buf(),
        module_name,
        outcome,
    }
}

/// Parse every file in parallel. Reports keep the order of `paths`.
pub fn parse_files(paths: &[PathBuf]) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|path| {
            let report = parse_file(path);
            match &report.outcome {
                Ok(Some(parse)) => tracing::debug!(
                    path = %path.display(),
                    module = %report.module_name,
                    properties = parse.schema.properties.len(),
                    faults = parse.errors.len(),
                    "parsed module"
                ),
                Ok(None) => tracing::debug!(path = %path.display(), "not a module spec"),
                Err(err) => tracing::debug!(path = %path.display(), error = %err, "failed"),
            }
            report
        })
        .collect()
}

/// Schemas of every successfully parsed module, keyed by module name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaSet {
    pub modules: IndexMap<String, NativeModuleSchema>,
}

impl SchemaSet {
    /// A later module with an already seen name replaces the earlier one.
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut set = Self::default();
        for report in reports {
            let Some(parse) = report.parse() else {
                continue;
            };
            let replaced = set
                .modules
                .insert(report.module_name.clone(), parse.schema.clone());
            if replaced.is_some() {
                tracing::warn!(
                    module = %report.module_name,
                    path = %report.path.display(),
                    "module defined more than once, keeping the last definition"
                );
            }
        }
        set
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
