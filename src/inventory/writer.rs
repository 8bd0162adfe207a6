use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tempfile::NamedTempFile;

use super::{COLUMNS, InventoryError, InventoryRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// CSV when the name ends in `.csv`, a workbook otherwise.
    pub fn from_file_name(name: &str) -> Self {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Xlsx,
        }
    }
}

/// Writes `records` to `output`. The document is assembled in a temporary
/// file beside `output` and moved over it only once complete.
pub fn write_records(
    records: &[InventoryRecord],
    format: OutputFormat,
    output: &Path,
) -> Result<(), InventoryError> {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let io_err = |source| InventoryError::Io {
        path: output.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".inventory-")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(io_err)?;

    match format {
        OutputFormat::Xlsx => write_xlsx(records, &mut tmp)?,
        OutputFormat::Csv => write_csv(records, &mut tmp)?,
    }

    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(output)
        .map_err(|source| InventoryError::Persist {
            path: output.to_path_buf(),
            source,
        })?;

    Ok(())
}

fn write_xlsx(records: &[InventoryRecord], tmp: &mut NamedTempFile) -> Result<(), InventoryError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in (0u16..).zip(COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        worksheet.write_number(row, 0, record.sl_no as f64)?;
        worksheet.write_string(row, 1, &record.types)?;
        worksheet.write_string(row, 2, &record.filenames)?;
    }

    workbook.save_to_writer(tmp.as_file_mut())?;
    Ok(())
}

fn write_csv(records: &[InventoryRecord], tmp: &mut NamedTempFile) -> Result<(), InventoryError> {
    // Header written by hand so an empty inventory still has one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(tmp.as_file_mut());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(())
}
