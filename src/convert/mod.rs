//! GRIB2 to NetCDF conversion of every matching file in a directory.

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::listing::{self, ListingError};

pub mod raster;
pub use raster::{GdalLibrary, RasterError, RasterLibrary};

pub const DEFAULT_SOURCE_EXTENSION: &str = ".grib2";
pub const DEFAULT_TARGET_EXTENSION: &str = ".nc";
pub const DEFAULT_DRIVER: &str = "NetCDF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSettings {
    pub source_extension: String,
    pub target_extension: String,
    /// GDAL driver name of the output format.
    pub driver: String,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            driver: DEFAULT_DRIVER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct SkippedJob {
    pub job: ConversionJob,
    pub error: RasterError,
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub converted: Vec<ConversionJob>,
    pub skipped: Vec<SkippedJob>,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error("invalid extension pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// One job per entry of `dir` whose name ends with `source_ext`, in file
/// name order. The output sits next to the input with `target_ext`; an entry
/// that would be written over itself is left out.
pub fn plan_jobs(
    dir: &Path,
    source_ext: &str,
    target_ext: &str,
) -> Result<Vec<ConversionJob>, ConvertError> {
    let pattern = Pattern::new(&format!("*{}", Pattern::escape(source_ext)))?;
    let new_ext = target_ext.strip_prefix('.').unwrap_or(target_ext);

    let jobs = listing::list_directory(dir)?
        .into_iter()
        .filter(|entry| pattern.matches(entry.file_name()))
        .filter_map(|entry| {
            let input = entry.path().to_path_buf();
            let output = input.with_extension(new_ext);
            if output == input {
                tracing::warn!("skipping {}: output would replace the input", input.display());
                return None;
            }
            Some(ConversionJob { input, output })
        })
        .collect();

    Ok(jobs)
}

/// Per-file progress handed to the caller of [`convert_directory_with`].
#[derive(Debug)]
pub enum JobEvent<'a> {
    Converted(&'a ConversionJob),
    Skipped(&'a SkippedJob),
}

/// Converts every matching file of `dir`. A file that cannot be opened or
/// copied is recorded as skipped and the pass continues.
pub fn convert_directory<L: RasterLibrary>(
    library: &L,
    dir: &Path,
    settings: &ConvertSettings,
) -> Result<ConvertReport, ConvertError> {
    convert_directory_with(library, dir, settings, |_| {})
}

/// Same as [`convert_directory`], calling `on_event` as soon as each file is
/// done.
pub fn convert_directory_with<L, F>(
    library: &L,
    dir: &Path,
    settings: &ConvertSettings,
    mut on_event: F,
) -> Result<ConvertReport, ConvertError>
where
    L: RasterLibrary,
    F: FnMut(JobEvent<'_>),
{
    let jobs = plan_jobs(dir, &settings.source_extension, &settings.target_extension)?;
    tracing::info!("{} files to convert in {}", jobs.len(), dir.display());

    let mut report = ConvertReport::default();
    for job in jobs {
        match convert_file(library, &job) {
            Ok(()) => {
                tracing::info!("conversion completed: {} created", job.output.display());
                on_event(JobEvent::Converted(&job));
                report.converted.push(job);
            }
            Err(error) => {
                tracing::warn!("skipping {}: {}", job.input.display(), error);
                let skipped = SkippedJob { job, error };
                on_event(JobEvent::Skipped(&skipped));
                report.skipped.push(skipped);
            }
        }
    }

    Ok(report)
}

fn convert_file<L: RasterLibrary>(library: &L, job: &ConversionJob) -> Result<(), RasterError> {
    let source = library.open_read_only(&job.input)?;
    let existed = job.output.exists();

    match library.create_copy(&source, &job.output) {
        Ok(destination) => {
            drop(destination);
            Ok(())
        }
        Err(e) => {
            // Drop whatever a failed copy left behind, unless it was there already.
            if !existed && job.output.exists() {
                if let Err(cleanup) = fs::remove_file(&job.output) {
                    tracing::warn!(
                        "could not remove partial output {}: {}",
                        job.output.display(),
                        cleanup
                    );
                }
            }
            Err(e)
        }
    }
}
