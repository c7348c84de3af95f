//! Walk a file's top-level constructs and emit Customizer diagnostics.
//!
//! The walk is a fold of [`ScanState`] over the items produced by
//! [`crate::parser::scan`]. The classifiers it calls are pure; all the state
//! lives here, scoped to a single file. Files are independent, so many files
//! lint in parallel with no coordination.

use crate::annotation::{self, AnnotationKind, HIDDEN_TAB};
use crate::error::{Error, Result};
use crate::expr::parse_expr;
use crate::parser::{scan, Item, ItemKind};
use crate::value::classify_value;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Severity of a diagnostic. Only errors fail a non-strict run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file.display(),
            self.line,
            self.severity,
            self.message
        )
    }
}

/// Result of linting one file. Diagnostics keep declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LintResult {
    pub file: PathBuf,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl LintResult {
    fn new(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// True iff the file produced no errors. Warnings never affect this;
    /// strict-mode policy belongs to the caller.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, line: usize, message: String) {
        self.errors.push(Diagnostic {
            file: self.file.clone(),
            line,
            severity: Severity::Error,
            message,
        });
    }

    fn warning(&mut self, line: usize, message: String) {
        self.warnings.push(Diagnostic {
            file: self.file.clone(),
            line,
            severity: Severity::Warning,
            message,
        });
    }
}

/// Walk state, scoped to one file.
#[derive(Debug)]
struct ScanState {
    in_parameter_section: bool,
    current_tab: Option<String>,
    pending_description: bool,
    seen_tab: bool,
    seen_param: bool,
    tab_warning_issued: bool,
}

impl ScanState {
    fn new() -> Self {
        Self {
            in_parameter_section: true,
            current_tab: None,
            pending_description: false,
            seen_tab: false,
            seen_param: false,
            tab_warning_issued: false,
        }
    }

    fn in_hidden_tab(&self) -> bool {
        self.current_tab.as_deref() == Some(HIDDEN_TAB)
    }
}

/// Lint source text under the given reporting path.
pub fn lint_source(file: &Path, content: &str) -> LintResult {
    let mut result = LintResult::new(file);
    let mut state = ScanState::new();

    for item in scan(content) {
        walk_item(&item, &mut state, &mut result);
    }

    if !state.seen_param {
        result.error(
            1,
            "No Customizer parameters found - file is not customizable".to_string(),
        );
    }

    result
}

fn walk_item(item: &Item, state: &mut ScanState, result: &mut LintResult) {
    match &item.kind {
        ItemKind::Blank | ItemKind::BlockComment | ItemKind::Other => {
            state.pending_description = false;
        }
        ItemKind::TabMarker(name) => {
            state.current_tab = Some(name.clone());
            state.seen_tab = true;
            state.pending_description = false;
        }
        ItemKind::Preview(directive) => {
            // Neither a description nor an annotation; validated, then
            // consumed without touching pending_description.
            for problem in annotation::check_preview(directive) {
                result.warning(item.line, format!("Preview directive: {problem}"));
            }
        }
        ItemKind::Comment(text) => {
            // A bracketed comment on its own line belongs to the preceding
            // declaration, not the next one.
            state.pending_description = !text.starts_with('[');
        }
        ItemKind::Callable(_) => {
            state.in_parameter_section = false;
            state.pending_description = false;
        }
        ItemKind::SpecialAssign(_) => {
            state.pending_description = false;
        }
        ItemKind::Assign {
            name,
            value,
            annotation,
        } => {
            if state.in_hidden_tab() {
                state.pending_description = false;
                return;
            }

            state.seen_param = true;
            check_parameter(item.line, name, value, annotation.as_deref(), state, result);
            state.pending_description = false;
        }
    }
}

/// Apply the per-parameter rule table. Each rule is independent; one
/// declaration may emit several diagnostics.
fn check_parameter(
    line: usize,
    name: &str,
    value: &str,
    annotation: Option<&str>,
    state: &mut ScanState,
    result: &mut LintResult,
) {
    if !state.in_parameter_section {
        result.warning(
            line,
            format!("Parameter '{name}' is after module declarations (won't be customizable)"),
        );
    }

    if !state.seen_tab && !state.tab_warning_issued {
        result.warning(
            line,
            "Parameters should be organized into tabs using /* [Tab Name] */".to_string(),
        );
        state.tab_warning_issued = true;
    }

    if !state.pending_description {
        result.warning(line, format!("Parameter '{name}' lacks a description comment"));
    }

    let class = classify_value(&parse_expr(value));
    if class.is_computed {
        let reason = class.reason.as_deref().unwrap_or("has a computed default");
        result.warning(line, format!("Parameter '{name}' {reason}"));
    }

    let trailing = annotation.map(str::trim).filter(|text| !text.is_empty());
    let kind = trailing.map(annotation::classify_annotation).unwrap_or(AnnotationKind::None);
    if !kind.is_valid() {
        let text = trailing.unwrap_or_default();
        result.error(
            line,
            format!("Parameter '{name}' has invalid annotation: {text}"),
        );
    } else if trailing.is_none() && !class.is_computed {
        // Any non-empty trailing comment counts as annotation-present, even
        // prose; only a bare declaration draws the text-input warning. A
        // computed default already won't render, so the warning would also
        // be noise on top of the computed-value warning.
        result.warning(
            line,
            format!("Parameter '{name}' has no UI annotation (will be a text input)"),
        );
    }
}

/// Lint one file from disk. A read failure becomes a single synthetic error
/// diagnostic at the line-0 sentinel; the walk does not run.
pub fn lint_file(path: &Path) -> LintResult {
    match std::fs::read_to_string(path) {
        Ok(content) => lint_source(path, &content),
        Err(source) => {
            let mut result = LintResult::new(path);
            result.error(0, format!("Could not read file: {}", Error::file_read(path, source)));
            result
        }
    }
}

/// Expand files and directories into `.scad` files and lint them all, one
/// result per file in deterministic order. Files are linted in parallel;
/// each walk owns its state, so no coordination is needed.
pub fn lint_paths(paths: &[PathBuf]) -> Result<Vec<LintResult>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(find_scad_files(path));
        } else {
            return Err(Error::InvalidPath { path: path.clone() });
        }
    }

    Ok(files.par_iter().map(|file| lint_file(file)).collect())
}

/// All `.scad` files under a directory, sorted for stable output.
pub fn find_scad_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "scad"))
        .collect()
}
