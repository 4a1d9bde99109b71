//! Compile command handler: CSV conventions to JSON documents, local only.

use crate::cli::error::CliError;
use crate::convert::{BatchReport, ConventionConverter, ConverterConfig};
use std::path::PathBuf;

/// Arguments for the compile command
#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Compile every CSV convention in the source directory to a JSON document.
pub fn handle_compile(args: &CompileArgs) -> Result<BatchReport, CliError> {
    if !args.source_dir.is_dir() {
        return Err(CliError::DirectoryNotFound(args.source_dir.clone()));
    }

    let config = ConverterConfig::new(&args.source_dir, &args.output_dir);
    let converter = ConventionConverter::new(config);
    let report = converter.compile_conventions()?;

    let compiled = report.outcomes.iter().filter(|o| o.succeeded()).count();
    println!(
        "Compiled {compiled} of {} conventions into {}",
        report.outcomes.len(),
        args.output_dir.display()
    );
    print_failures(&report);
    Ok(report)
}

/// Print the per-file failure summary after a batch run.
pub(crate) fn print_failures(report: &BatchReport) {
    for outcome in report.failures() {
        if let Some(error) = &outcome.error {
            eprintln!("- failed: {}: {error}", outcome.convention);
        }
    }
}
