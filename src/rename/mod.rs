//! Batch renaming of raster deliverables to the project naming convention.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::listing::{self, ListingError};

pub mod rule;
pub use rule::{DEFAULT_PREFIX, NameParts, NamingConvention, ParsedName};

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("{0} already exists")]
    Collision(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub struct RenameFailure {
    pub from: String,
    pub to: String,
    pub error: RenameError,
}

#[derive(Debug, Default)]
pub struct RenameStats {
    /// Renames performed, or planned on a dry run.
    pub renamed: Vec<Renamed>,
    pub failures: Vec<RenameFailure>,
    pub unchanged: usize,
}

#[derive(Debug)]
pub enum RenameOutcome {
    /// The target could not be listed; nothing in it was touched.
    Skipped(ListingError),
    Processed(RenameStats),
}

#[derive(Debug)]
pub struct RenameReport {
    pub directory: PathBuf,
    pub outcome: RenameOutcome,
}

/// Renames the entries of every directory in `dirs`. A target that is
/// missing or unreadable is reported and skipped.
pub fn rename_directories(
    dirs: &[PathBuf],
    convention: &NamingConvention,
    dry_run: bool,
) -> Vec<RenameReport> {
    tracing::info!("renaming to {} in {} directories", convention, dirs.len());

    dirs.iter()
        .map(|dir| {
            let outcome = match rename_directory(dir, convention, dry_run) {
                Ok(stats) => RenameOutcome::Processed(stats),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", dir.display(), e);
                    RenameOutcome::Skipped(e)
                }
            };
            RenameReport {
                directory: dir.clone(),
                outcome,
            }
        })
        .collect()
}

/// Renames every entry of `dir` (files and subdirectories) whose name the
/// convention maps to a different name. Individual failures are collected
/// and do not stop the pass.
pub fn rename_directory(
    dir: &Path,
    convention: &NamingConvention,
    dry_run: bool,
) -> Result<RenameStats, ListingError> {
    let entries = listing::list_directory(dir)?;
    let mut stats = RenameStats::default();
    // Targets claimed earlier in this pass, so a dry run sees the same
    // collisions a real run would.
    let mut claimed: HashSet<String> = HashSet::new();

    for entry in entries {
        let Some(old_name) = entry.utf8_name() else {
            tracing::warn!(
                "leaving {} alone: name is not valid UTF-8",
                entry.path().display()
            );
            stats.unchanged += 1;
            continue;
        };
        let new_name = convention.rename_file(old_name);

        if new_name == old_name {
            tracing::debug!("{} already follows the convention", old_name);
            stats.unchanged += 1;
            continue;
        }

        let target = dir.join(&new_name);
        let result = if target.exists() || claimed.contains(&new_name) {
            Err(RenameError::Collision(target))
        } else if dry_run {
            Ok(())
        } else {
            fs::rename(entry.path(), &target).map_err(RenameError::from)
        };

        match result {
            Ok(()) => {
                if dry_run {
                    tracing::info!("would rename {} to {}", old_name, new_name);
                } else {
                    tracing::info!("renamed {} to {}", old_name, new_name);
                }
                claimed.insert(new_name.clone());
                stats.renamed.push(Renamed {
                    from: old_name.to_string(),
                    to: new_name,
                });
            }
            Err(error) => {
                tracing::warn!("failed to rename {}: {}", old_name, error);
                stats.failures.push(RenameFailure {
                    from: old_name.to_string(),
                    to: new_name,
                    error,
                });
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_rename_directory() {
        let dir = tempdir().unwrap();
        for name in ["202309_NOAA_precip.tif", "202309_NOAA_precip.vrt", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let stats = rename_directory(dir.path(), &NamingConvention::default(), false).unwrap();

        assert_eq!(stats.renamed.len(), 2);
        assert_eq!(stats.unchanged, 1);
        assert!(stats.failures.is_empty());
        assert_eq!(
            names_in(dir.path()),
            vec![
                "Amite_202309_NOAA_Maxprecip.tif",
                "Amite_202309_NOAA_Maxprecip.vrt",
                "notes.txt",
            ]
        );
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("202309_NOAA_precip.tif")).unwrap();
        let convention = NamingConvention::default();

        rename_directory(dir.path(), &convention, false).unwrap();
        let after_first = names_in(dir.path());
        let stats = rename_directory(dir.path(), &convention, false).unwrap();

        assert!(stats.renamed.is_empty());
        assert_eq!(stats.unchanged, 1);
        assert_eq!(names_in(dir.path()), after_first);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_is_left_alone() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let raw = OsStr::from_bytes(b"202309_NO\xffAA_precip.tif");
        File::create(dir.path().join(raw)).unwrap();
        File::create(dir.path().join("202310_NOAA_precip.tif")).unwrap();

        let stats = rename_directory(dir.path(), &NamingConvention::default(), false).unwrap();

        assert_eq!(stats.unchanged, 1);
        assert!(stats.failures.is_empty());
        assert_eq!(
            stats.renamed,
            vec![Renamed {
                from: "202310_NOAA_precip.tif".to_string(),
                to: "Amite_202310_NOAA_Maxprecip.tif".to_string(),
            }]
        );
        assert!(dir.path().join(raw).exists());
    }

    #[test]
    fn test_subdirectories_are_renamed() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("202309_NOAA_precip")).unwrap();

        let stats = rename_directory(dir.path(), &NamingConvention::default(), false).unwrap();

        assert_eq!(stats.renamed.len(), 1);
        assert!(dir.path().join("Amite_202309_NOAA_Maxprecip").is_dir());
    }

    #[test]
    fn test_collision_is_reported_and_pass_continues() {
        let dir = tempdir().unwrap();
        for name in [
            "202309_NOAA_precip.tif",
            "202309_NOAA_precip_v2.tif",
            "202310_NOAA_precip.tif",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let stats = rename_directory(dir.path(), &NamingConvention::default(), false).unwrap();

        assert_eq!(stats.renamed.len(), 2);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].from, "202309_NOAA_precip_v2.tif");
        assert!(matches!(stats.failures[0].error, RenameError::Collision(_)));
        assert!(dir.path().join("202309_NOAA_precip_v2.tif").exists());
        assert!(dir.path().join("Amite_202310_NOAA_Maxprecip.tif").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        for name in ["202309_NOAA_precip.tif", "202309_NOAA_precip_v2.tif"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let before = names_in(dir.path());

        let stats = rename_directory(dir.path(), &NamingConvention::default(), true).unwrap();

        assert_eq!(names_in(dir.path()), before);
        assert_eq!(
            stats.renamed,
            vec![Renamed {
                from: "202309_NOAA_precip.tif".to_string(),
                to: "Amite_202309_NOAA_Maxprecip.tif".to_string(),
            }]
        );
        assert_eq!(stats.failures.len(), 1);
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("rasters");
        fs::create_dir(&good).unwrap();
        File::create(good.join("202309_NOAA_precip.tif")).unwrap();
        let missing = dir.path().join("missing");
        let not_dir = dir.path().join("file.txt");
        File::create(&not_dir).unwrap();

        let reports = rename_directories(
            &[missing.clone(), not_dir, good.clone()],
            &NamingConvention::default(),
            false,
        );

        assert_eq!(reports.len(), 3);
        assert!(matches!(
            reports[0].outcome,
            RenameOutcome::Skipped(ListingError::NotFound(_))
        ));
        assert!(matches!(
            reports[1].outcome,
            RenameOutcome::Skipped(ListingError::NotADirectory(_))
        ));
        match &reports[2].outcome {
            RenameOutcome::Processed(stats) => assert_eq!(stats.renamed.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(good.join("Amite_202309_NOAA_Maxprecip.tif").exists());
    }
}
