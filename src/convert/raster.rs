use gdal::cpl::CslStringList;
use gdal::{Dataset, DatasetOptions, Driver, DriverManager, GdalOpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to open {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("failed to create {path}: {reason}")]
    Copy { path: PathBuf, reason: String },

    #[error("driver {name} is not available: {reason}")]
    Driver { name: String, reason: String },
}

/// Raster I/O backend used by the converter.
///
/// Datasets close their underlying handle when dropped, so a caller only has
/// to let them go out of scope.
pub trait RasterLibrary {
    type Dataset;

    fn open_read_only(&self, path: &Path) -> Result<Self::Dataset, RasterError>;

    /// Writes a copy of `source` to `destination` in the library's output
    /// format and returns the new dataset.
    fn create_copy(
        &self,
        source: &Self::Dataset,
        destination: &Path,
    ) -> Result<Self::Dataset, RasterError>;
}

/// GDAL backend writing through a single named driver.
pub struct GdalLibrary {
    driver: Driver,
}

impl GdalLibrary {
    pub fn new(driver_name: &str) -> Result<Self, RasterError> {
        let driver =
            DriverManager::get_driver_by_name(driver_name).map_err(|e| RasterError::Driver {
                name: driver_name.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!("using GDAL driver {}", driver.short_name());
        Ok(Self { driver })
    }
}

impl RasterLibrary for GdalLibrary {
    type Dataset = Dataset;

    fn open_read_only(&self, path: &Path) -> Result<Dataset, RasterError> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_READONLY | GdalOpenFlags::GDAL_OF_RASTER,
            ..Default::default()
        };

        Dataset::open_ex(path, options).map_err(|e| RasterError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn create_copy(&self, source: &Dataset, destination: &Path) -> Result<Dataset, RasterError> {
        let options = CslStringList::new();

        source
            .create_copy(&self.driver, destination, &options)
            .map_err(|e| RasterError::Copy {
                path: destination.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
