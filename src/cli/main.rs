//! CLI binary entry point for sofa-conventions-cli

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use sofa_conventions::cli::commands::compile::{CompileArgs, handle_compile};
#[cfg(feature = "cli")]
use sofa_conventions::cli::commands::list::{ListArgs, handle_list};
#[cfg(feature = "cli")]
use sofa_conventions::cli::commands::update::{UpdateArgs, handle_update};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "sofa-conventions-cli")]
#[command(about = "Sync and compile SOFA convention definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Download conventions from SOFAtoolbox and compile them to JSON
    Update {
        /// Directory holding the CSV convention files
        #[arg(long, default_value = "conventions/source")]
        source_dir: PathBuf,
        /// Directory the JSON documents are written to
        #[arg(long, default_value = "conventions/json")]
        output_dir: PathBuf,
        /// Update without asking for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Compile local CSV conventions to JSON without syncing
    Compile {
        /// Directory holding the CSV convention files
        #[arg(long, default_value = "conventions/source")]
        source_dir: PathBuf,
        /// Directory the JSON documents are written to
        #[arg(long, default_value = "conventions/json")]
        output_dir: PathBuf,
    },
    /// List the compiled conventions
    List {
        /// Directory holding the compiled JSON documents
        #[arg(long, default_value = "conventions/json")]
        output_dir: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Update {
            source_dir,
            output_dir,
            yes,
        } => {
            let args = UpdateArgs {
                source_dir,
                output_dir,
                assume_yes: yes,
            };
            handle_update(&args).map(|report| report.is_some_and(|r| r.has_failures()))
        }
        Commands::Compile {
            source_dir,
            output_dir,
        } => {
            let args = CompileArgs {
                source_dir,
                output_dir,
            };
            handle_compile(&args).map(|report| report.has_failures())
        }
        Commands::List { output_dir } => {
            let args = ListArgs { output_dir };
            handle_list(&args).map(|_| false)
        }
    };

    match result {
        Ok(failed) => {
            if failed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
