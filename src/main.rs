//! CLI entry point for the Customizer linter.

use clap::{Parser, ValueEnum};
use customizer_lint::{
    format_results, lint_paths, OutputFormat, RenderOptions, Summary,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "customizer-lint")]
#[command(author, version, about = "Lint OpenSCAD files for MakerBot Customizer compliance")]
struct Cli {
    /// Files or directories to lint
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,

    /// Only show errors, not warnings
    #[arg(long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let results = match lint_paths(&cli.paths) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let options = RenderOptions {
        quiet: cli.quiet,
        strict: cli.strict,
    };
    print!("{}", format_results(&results, cli.format.into(), options));

    if Summary::new(&results, cli.strict).passed(cli.strict) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
