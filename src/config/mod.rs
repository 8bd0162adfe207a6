use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::convert::ConvertSettings;
use crate::inventory::InventorySettings;
use crate::rename::NamingConvention;

pub mod error;
pub use error::ConfigError;

/// `inventory` section. Every field is optional; missing values fall back to
/// the command line or the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventorySection {
    pub directory: Option<PathBuf>,
    pub output_name: Option<String>,
    pub exclude_suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameSection {
    pub directories: Vec<PathBuf>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertSection {
    pub directory: Option<PathBuf>,
    pub source_extension: Option<String>,
    pub target_extension: Option<String>,
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    inventory: InventorySection,
    rename: RenameSection,
    convert: ConvertSection,
}

// Sections are validated while deserializing so a bad config file is rejected
// before any directory is touched.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            #[serde(default)]
            inventory: InventorySection,
            #[serde(default)]
            rename: RenameSection,
            #[serde(default)]
            convert: ConvertSection,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        validate_inventory(&helper.inventory).map_err(D::Error::custom)?;
        validate_rename(&helper.rename).map_err(D::Error::custom)?;
        validate_convert(&helper.convert).map_err(D::Error::custom)?;

        Ok(Config {
            inventory: helper.inventory,
            rename: helper.rename,
            convert: helper.convert,
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Resolves the inventory directory and settings. Values in `overrides`
    /// win over the config file, which wins over the defaults.
    pub fn inventory(
        &self,
        overrides: InventorySection,
    ) -> Result<(PathBuf, InventorySettings), ConfigError> {
        validate_inventory(&overrides)?;

        let directory = overrides
            .directory
            .or_else(|| self.inventory.directory.clone())
            .ok_or(ConfigError::MissingDirectory("inventory"))?;

        let mut settings = InventorySettings::default();
        if let Some(name) = overrides
            .output_name
            .or_else(|| self.inventory.output_name.clone())
        {
            settings.output_name = name;
        }
        if let Some(suffix) = overrides
            .exclude_suffix
            .or_else(|| self.inventory.exclude_suffix.clone())
        {
            settings.exclude_suffix = suffix;
        }

        Ok((directory, settings))
    }

    /// Resolves the rename targets. Directories given on the command line
    /// replace the configured list rather than extending it.
    pub fn rename(
        &self,
        overrides: RenameSection,
    ) -> Result<(Vec<PathBuf>, NamingConvention), ConfigError> {
        validate_rename(&overrides)?;

        let directories = if overrides.directories.is_empty() {
            self.rename.directories.clone()
        } else {
            overrides.directories
        };
        if directories.is_empty() {
            return Err(ConfigError::MissingDirectory("rename"));
        }

        let convention = match overrides.prefix.or_else(|| self.rename.prefix.clone()) {
            Some(prefix) => NamingConvention::new(prefix)?,
            None => NamingConvention::default(),
        };

        Ok((directories, convention))
    }

    pub fn convert(
        &self,
        overrides: ConvertSection,
    ) -> Result<(PathBuf, ConvertSettings), ConfigError> {
        validate_convert(&overrides)?;

        let directory = overrides
            .directory
            .or_else(|| self.convert.directory.clone())
            .ok_or(ConfigError::MissingDirectory("convert"))?;

        let mut settings = ConvertSettings::default();
        if let Some(ext) = overrides
            .source_extension
            .or_else(|| self.convert.source_extension.clone())
        {
            settings.source_extension = ext;
        }
        if let Some(ext) = overrides
            .target_extension
            .or_else(|| self.convert.target_extension.clone())
        {
            settings.target_extension = ext;
        }
        if let Some(driver) = overrides.driver.or_else(|| self.convert.driver.clone()) {
            settings.driver = driver;
        }
        check_distinct_extensions(&settings.source_extension, &settings.target_extension)?;

        Ok((directory, settings))
    }
}

pub fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.len() > 1 && ext.starts_with('.') && !ext.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(ConfigError::Extension(ext.to_string()))
    }
}

pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || prefix.ends_with('_') || prefix.contains(['/', '\\']) {
        Err(ConfigError::Prefix(prefix.to_string()))
    } else {
        Ok(())
    }
}

pub fn validate_output_name(name: &str) -> Result<(), ConfigError> {
    let bare = Path::new(name)
        .file_name()
        .is_some_and(|file_name| file_name == name);

    if bare && !name.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(ConfigError::OutputName(name.to_string()))
    }
}

fn validate_inventory(section: &InventorySection) -> Result<(), ConfigError> {
    if let Some(name) = &section.output_name {
        validate_output_name(name)?;
    }
    // An empty suffix would match every file.
    if section.exclude_suffix.as_deref() == Some("") {
        return Err(ConfigError::ExcludeSuffix);
    }
    Ok(())
}

fn validate_rename(section: &RenameSection) -> Result<(), ConfigError> {
    if let Some(prefix) = &section.prefix {
        validate_prefix(prefix)?;
    }
    Ok(())
}

fn validate_convert(section: &ConvertSection) -> Result<(), ConfigError> {
    for ext in [&section.source_extension, &section.target_extension]
        .into_iter()
        .flatten()
    {
        validate_extension(ext)?;
    }
    if let (Some(source), Some(target)) = (&section.source_extension, &section.target_extension) {
        check_distinct_extensions(source, target)?;
    }
    Ok(())
}

fn check_distinct_extensions(source: &str, target: &str) -> Result<(), ConfigError> {
    if source.eq_ignore_ascii_case(target) {
        Err(ConfigError::SameExtension(target.to_string()))
    } else {
        Ok(())
    }
}
