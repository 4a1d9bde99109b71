//! Update command handler: sync conventions from SOFAtoolbox, then compile.

use crate::cli::error::CliError;
use crate::convert::BatchReport;
use std::path::PathBuf;

/// Arguments for the update command
#[derive(Debug, Clone)]
pub struct UpdateArgs {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
}

/// Sync the local CSV set with upstream and recompile all JSON documents.
///
/// Returns `Ok(None)` when the user declines the confirmation prompt.
#[cfg(feature = "remote")]
pub fn handle_update(args: &UpdateArgs) -> Result<Option<BatchReport>, CliError> {
    use crate::convert::{ConventionConverter, ConverterConfig};
    use crate::source::remote::{RemoteSource, SOFATOOLBOX_INDEX_URL};

    if !args.assume_yes && !confirm()? {
        println!("Updating the conventions was canceled.");
        return Ok(None);
    }

    println!("Reading SOFA conventions from {SOFATOOLBOX_INDEX_URL} ...");

    let remote = RemoteSource::new()?;
    let config =
        ConverterConfig::new(&args.source_dir, &args.output_dir).with_remote(remote);
    let converter = ConventionConverter::new(config);
    let report = converter.update_conventions()?;

    for outcome in report.changed() {
        match outcome.sync {
            crate::convert::SyncStatus::Added => {
                println!("- added new convention: {}", outcome.convention)
            }
            _ => println!("- updated existing convention: {}", outcome.convention),
        }
    }
    super::compile::print_failures(&report);

    if report.changed().next().is_some() {
        println!("... done.");
    } else {
        println!("... conventions already up to date.");
    }
    Ok(Some(report))
}

#[cfg(not(feature = "remote"))]
pub fn handle_update(_args: &UpdateArgs) -> Result<Option<BatchReport>, CliError> {
    Err(CliError::InvalidArgument(
        "Remote sync not enabled. Enable 'remote' feature.".to_string(),
    ))
}

/// Updating can break downstream tooling when upstream ships broken
/// conventions, so it must be acknowledged interactively.
#[cfg(feature = "remote")]
fn confirm() -> Result<bool, CliError> {
    use std::io::BufRead;

    println!(
        "Are you sure that you want to update the conventions? \
         If the upstream conventions contain errors, the compiled JSON \
         documents can break downstream SOFA tooling. (y/n)"
    );
    let mut response = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut response)
        .map_err(|e| CliError::IoError(e.to_string()))?;
    Ok(response.trim() == "y")
}
