//! Render lint results for the CLI.
//!
//! Diagnostics render one per line as `path:line: severity: message`, ordered
//! by file and then detection order, with errors ahead of warnings within a
//! file. The summary and strict-mode accounting live here so the library
//! callers get the same policy as the CLI.

use crate::linter::LintResult;
use colored::Colorize;
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// Aggregate counts over a set of lint results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    /// Under strict accounting a file with warnings also counts as failed.
    pub fn new(results: &[LintResult], strict: bool) -> Self {
        let files = results.len();
        let failed = results
            .iter()
            .filter(|r| !r.passed() || (strict && !r.warnings.is_empty()))
            .count();
        let errors = results.iter().map(|r| r.errors.len()).sum();
        let warnings = results.iter().map(|r| r.warnings.len()).sum();

        Self {
            files,
            passed: files - failed,
            failed,
            errors,
            warnings,
        }
    }

    pub fn passed(&self, strict: bool) -> bool {
        if strict {
            self.errors == 0 && self.warnings == 0
        } else {
            self.errors == 0
        }
    }
}

/// Rendering options owned by the surrounding CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub quiet: bool,
    pub strict: bool,
}

/// Format lint results in the requested output format.
pub fn format_results(
    results: &[LintResult],
    format: OutputFormat,
    options: RenderOptions,
) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(results).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(results).unwrap_or_default(),
        OutputFormat::Text => format_results_text(results, options),
    }
}

fn format_results_text(results: &[LintResult], options: RenderOptions) -> String {
    let mut output = String::new();

    for result in results {
        for error in &result.errors {
            output.push_str(&format!("{}\n", error.to_string().red()));
        }

        if !options.quiet {
            for warning in &result.warnings {
                output.push_str(&format!("{}\n", warning.to_string().yellow()));
            }
        }
    }

    let summary = Summary::new(results, options.strict);
    output.push('\n');
    output.push_str(&format_summary(&summary));

    output
}

fn format_summary(summary: &Summary) -> String {
    if summary.failed == 0 {
        format!(
            "{}\n",
            format!(
                "All {} file(s) passed Customizer linting",
                summary.files
            )
            .green()
        )
    } else {
        format!(
            "{}\n  {} error(s), {} warning(s)\n",
            format!("{} file(s) failed, {} passed", summary.failed, summary.passed).red(),
            summary.errors,
            summary.warnings
        )
    }
}
