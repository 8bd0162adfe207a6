//! Maintenance tools for geospatial data deliverables:
//!
//! - [`inventory`]: spreadsheet listing of the files in a directory
//! - [`rename`]: batch renaming of rasters to the project naming convention
//! - [`convert`]: GRIB2 to NetCDF conversion through GDAL
//!
//! Each tool makes one sequential pass over a single directory.

pub mod cli;
pub mod config;
pub mod convert;
pub mod inventory;
pub mod listing;
pub mod logging;
pub mod rename;
