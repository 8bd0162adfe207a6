//! Command-line interface: one subcommand per maintenance tool.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, ConvertSection, InventorySection, RenameSection};
use crate::convert::{self, ConvertReport, GdalLibrary, JobEvent};
use crate::inventory::{self, InventorySummary};
use crate::logging;
use crate::rename::{self, RenameOutcome, RenameReport};

#[derive(Debug, Parser)]
#[command(name = "tessera")]
#[command(about = "Batch maintenance for geospatial deliverables", version)]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true, env = "TESSERA_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a spreadsheet listing the files of a directory
    Inventory {
        /// Directory to list
        #[arg(env = "TESSERA_INVENTORY_DIR")]
        directory: Option<PathBuf>,
        /// Name of the spreadsheet written into the directory (.xlsx or .csv)
        #[arg(long)]
        output_name: Option<String>,
        /// Leave out files ending with this suffix
        #[arg(long)]
        exclude_suffix: Option<String>,
    },

    /// Rename raster files to <prefix>_<period>_<source>_Max<datatype>
    Rename {
        /// Directories to process
        directories: Vec<PathBuf>,
        /// Project name placed at the front of every new name
        #[arg(long)]
        prefix: Option<String>,
        /// Report the renames without performing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert GRIB2 files to NetCDF with GDAL
    Convert {
        /// Directory holding the files to convert
        #[arg(env = "TESSERA_CONVERT_DIR")]
        directory: Option<PathBuf>,
        /// Extension of the files to convert
        #[arg(long)]
        source_extension: Option<String>,
        /// Extension given to the converted files
        #[arg(long)]
        target_extension: Option<String>,
        /// GDAL driver used to write the output
        #[arg(long)]
        driver: Option<String>,
    },
}

/// Parses the process arguments, sets up logging, and runs the command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    run_with(cli)
}

pub fn run_with(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            tracing::info!("loaded config from {}", path.display());
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Inventory {
            directory,
            output_name,
            exclude_suffix,
        } => {
            let (directory, settings) = config.inventory(InventorySection {
                directory,
                output_name,
                exclude_suffix,
            })?;
            let summary = inventory::write_inventory(&directory, &settings)
                .with_context(|| format!("inventory of {} failed", directory.display()))?;
            print_inventory(&summary);
        }
        Command::Rename {
            directories,
            prefix,
            dry_run,
        } => {
            let (directories, convention) = config.rename(RenameSection {
                directories,
                prefix,
            })?;
            if dry_run {
                println!("DRY RUN: no files will be renamed");
            }
            let reports = rename::rename_directories(&directories, &convention, dry_run);
            print_rename(&reports, dry_run);
        }
        Command::Convert {
            directory,
            source_extension,
            target_extension,
            driver,
        } => {
            let (directory, settings) = config.convert(ConvertSection {
                directory,
                source_extension,
                target_extension,
                driver,
            })?;
            let library = GdalLibrary::new(&settings.driver)?;
            let report =
                convert::convert_directory_with(&library, &directory, &settings, print_job)
                    .with_context(|| format!("conversion in {} failed", directory.display()))?;
            print_convert(&report);
        }
    }

    Ok(())
}

fn print_inventory(summary: &InventorySummary) {
    println!(
        "Listed {} files in {}",
        summary.records,
        summary.output.display()
    );
}

fn print_rename(reports: &[RenameReport], dry_run: bool) {
    let verb = if dry_run { "Would rename" } else { "Renamed" };

    for report in reports {
        match &report.outcome {
            RenameOutcome::Skipped(e) => {
                eprintln!("Skipping {}: {}", report.directory.display(), e);
            }
            RenameOutcome::Processed(stats) => {
                for renamed in &stats.renamed {
                    println!("{} {} to {}", verb, renamed.from, renamed.to);
                }
                for failure in &stats.failures {
                    eprintln!(
                        "Failed to rename {} to {}: {}",
                        failure.from, failure.to, failure.error
                    );
                }
                println!(
                    "{}: {} renamed, {} failed, {} unchanged",
                    report.directory.display(),
                    stats.renamed.len(),
                    stats.failures.len(),
                    stats.unchanged
                );
            }
        }
    }
}

fn print_job(event: JobEvent<'_>) {
    match event {
        JobEvent::Converted(job) => {
            println!("Conversion completed: {} created.", job.output.display());
        }
        JobEvent::Skipped(skipped) => eprintln!("{}. Skipping...", skipped.error),
    }
}

fn print_convert(report: &ConvertReport) {
    println!(
        "{} converted, {} skipped",
        report.converted.len(),
        report.skipped.len()
    );
}
