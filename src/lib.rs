//! # customizer-lint
//!
//! A linter that checks OpenSCAD files for MakerBot Customizer compliance:
//! parameters grouped under tab markers, description comments, literal
//! default values the Customizer UI can render, and well-formed trailing
//! annotations selecting the UI control type.
//!
//! ## Example
//!
//! ```rust,no_run
//! use customizer_lint::{format_results, lint_file, OutputFormat, RenderOptions};
//! use std::path::Path;
//!
//! let result = lint_file(Path::new("model.scad"));
//! let rendered = format_results(
//!     std::slice::from_ref(&result),
//!     OutputFormat::Text,
//!     RenderOptions::default(),
//! );
//! println!("{rendered}");
//! assert!(result.passed());
//! ```

pub mod annotation;
pub mod error;
pub mod expr;
pub mod linter;
pub mod output;
pub mod parser;
pub mod value;

pub use annotation::{check_preview, classify_annotation, AnnotationKind, HIDDEN_TAB};
pub use error::{Error, Result};
pub use expr::{parse_expr, BinaryOp, Expr, UnaryOp};
pub use linter::{
    find_scad_files, lint_file, lint_paths, lint_source, Diagnostic, LintResult, Severity,
};
pub use output::{format_results, OutputFormat, RenderOptions, Summary};
pub use value::{classify_value, ValueClass, ValueKind};
