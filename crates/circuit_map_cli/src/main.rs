//! Offline catalog tooling for circuit_map
//!
//! `build` scans curated example grids against a group and transition
//! configuration and writes a circuit catalog; `merge` unions several
//! catalogs; `inspect` prints a deterministic summary of one. All inputs
//! and outputs are the JSON documents defined by `circuit_map_core` and
//! `circuit_map_engine`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use circuit_map_core::{GroupSet, TransitionSet};
use circuit_map_engine::{extract_from_sources, CatalogError, CircuitCatalog, ExtractError};

#[derive(Parser)]
#[command(
    name = "circuit_map_cli",
    version,
    about = "Build and maintain circuit catalogs for tile grids"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a catalog from example grid documents
    Build {
        /// Example grid documents (.grid.json)
        #[arg(required = true, value_name = "GRID")]
        grids: Vec<PathBuf>,
        /// Group configuration document (.groups.json)
        #[arg(long)]
        groups: PathBuf,
        /// Transition configuration document (.transitions.json)
        #[arg(long)]
        transitions: PathBuf,
        /// Where to write the catalog
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Union several catalog files into one
    Merge {
        /// Catalog files to merge
        #[arg(required = true, value_name = "CATALOG")]
        inputs: Vec<PathBuf>,
        /// Where to write the merged catalog
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print a summary of a catalog file
    Inspect {
        /// Catalog file to summarize
        catalog: PathBuf,
    },
}

/// Error type for tool failures. Every variant names the offending input.
#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration in '{path}': {reason}")]
    Config { path: PathBuf, reason: String },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Build {
            grids,
            groups,
            transitions,
            output,
        } => build(&grids, &groups, &transitions, &output),
        Command::Merge { inputs, output } => merge(&inputs, &output),
        Command::Inspect { catalog } => inspect(&catalog),
    }
}

fn build(
    grids: &[PathBuf],
    groups_path: &Path,
    transitions_path: &Path,
    output: &Path,
) -> Result<(), CliError> {
    let groups: GroupSet = load_document(groups_path)?;
    groups.validate().map_err(|reason| CliError::Config {
        path: groups_path.to_path_buf(),
        reason,
    })?;

    let transitions: TransitionSet = load_document(transitions_path)?;
    transitions.validate().map_err(|reason| CliError::Config {
        path: transitions_path.to_path_buf(),
        reason,
    })?;

    let catalog = extract_from_sources(grids, &groups, &transitions)?;
    catalog.export_to_file(output)?;
    println!(
        "wrote {}: {} circuits, {} candidate tiles from {} grid(s)",
        output.display(),
        catalog.len(),
        catalog.candidate_count(),
        grids.len()
    );
    Ok(())
}

fn merge(inputs: &[PathBuf], output: &Path) -> Result<(), CliError> {
    let mut catalogs = Vec::with_capacity(inputs.len());
    for input in inputs {
        catalogs.push(CircuitCatalog::import_from_file(input)?);
    }
    let merged = CircuitCatalog::merge(catalogs);
    merged.export_to_file(output)?;
    println!(
        "wrote {}: {} circuits, {} candidate tiles from {} catalog(s)",
        output.display(),
        merged.len(),
        merged.candidate_count(),
        inputs.len()
    );
    Ok(())
}

fn inspect(path: &Path) -> Result<(), CliError> {
    let catalog = CircuitCatalog::import_from_file(path)?;
    println!(
        "{}: {} circuits, {} candidate tiles",
        path.display(),
        catalog.len(),
        catalog.candidate_count()
    );
    for (key, tiles) in catalog.entries() {
        let ids: Vec<String> = tiles.keys().map(u32::to_string).collect();
        println!("  {key}  [{}]", ids.join(", "));
    }
    Ok(())
}

fn load_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
