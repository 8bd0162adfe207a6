//! Inventory of the files in a deliverables directory, written as a
//! spreadsheet next to the files it lists.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::listing::{self, ListingError};

pub mod writer;
pub use writer::OutputFormat;

pub const DEFAULT_OUTPUT_NAME: &str = "file_list.xlsx";
pub const DEFAULT_EXCLUDE_SUFFIX: &str = ".lock";

/// Column headers, in output order.
pub const COLUMNS: [&str; 3] = ["Sl_No", "Types", "Filenames"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    #[serde(rename = "Sl_No")]
    pub sl_no: usize,
    #[serde(rename = "Types")]
    pub types: String,
    #[serde(rename = "Filenames")]
    pub filenames: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySettings {
    /// Name of the spreadsheet written inside the scanned directory.
    pub output_name: String,
    /// Files whose name ends with this suffix are left out.
    pub exclude_suffix: String,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            exclude_suffix: DEFAULT_EXCLUDE_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySummary {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub records: usize,
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Lists the regular files of `dir`, minus those ending in `exclude_suffix`,
/// as records numbered from 1 in file name order.
pub fn build_inventory(
    dir: &Path,
    exclude_suffix: &str,
) -> Result<Vec<InventoryRecord>, InventoryError> {
    let records = listing::list_directory(dir)?
        .into_iter()
        .filter(|entry| entry.is_file() && !entry.file_name().ends_with(exclude_suffix))
        .enumerate()
        .map(|(index, entry)| InventoryRecord {
            sl_no: index + 1,
            types: entry.extension().to_string(),
            filenames: entry.file_name().to_string(),
        })
        .collect();

    Ok(records)
}

/// Builds the inventory of `dir` and writes it to `dir/<output_name>`,
/// replacing any previous inventory.
pub fn write_inventory(
    dir: &Path,
    settings: &InventorySettings,
) -> Result<InventorySummary, InventoryError> {
    let records = build_inventory(dir, &settings.exclude_suffix)?;
    let format = OutputFormat::from_file_name(&settings.output_name);
    let output = dir.join(&settings.output_name);

    writer::write_records(&records, format, &output)?;

    tracing::info!(
        "wrote {} records to {} ({:?})",
        records.len(),
        output.display(),
        format
    );

    Ok(InventorySummary {
        output,
        format,
        records: records.len(),
    })
}
