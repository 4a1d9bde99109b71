//! List command handler: show the compiled conventions.

use crate::cli::error::CliError;
use std::path::PathBuf;

/// Arguments for the list command
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub output_dir: PathBuf,
}

/// Print the names of all compiled convention documents, sorted.
pub fn handle_list(args: &ListArgs) -> Result<Vec<String>, CliError> {
    if !args.output_dir.is_dir() {
        return Err(CliError::DirectoryNotFound(args.output_dir.clone()));
    }

    let mut conventions: Vec<String> = std::fs::read_dir(&args.output_dir)
        .map_err(|e| CliError::FileReadError(args.output_dir.clone(), e.to_string()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(String::from)
        })
        .collect();
    conventions.sort();

    for convention in &conventions {
        println!("{convention}");
    }
    Ok(conventions)
}
