use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A single entry of a scanned directory. Read fresh on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    path: PathBuf,
    file_name: OsString,
    display_name: String,
    is_file: bool,
}

impl DirectoryEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display. Bytes that are not valid UTF-8 are replaced,
    /// so never build a path from it.
    pub fn file_name(&self) -> &str {
        &self.display_name
    }

    pub fn file_name_os(&self) -> &OsStr {
        &self.file_name
    }

    /// The file name when it is valid UTF-8.
    pub fn utf8_name(&self) -> Option<&str> {
        self.file_name.to_str()
    }

    /// True for regular files, following symlinks.
    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn extension(&self) -> &str {
        split_extension(&self.display_name).1
    }
}

#[derive(Debug)]
pub enum ListingError {
    NotFound(PathBuf),
    NotADirectory(PathBuf),
    Io(PathBuf, io::Error),
}

impl fmt::Display for ListingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingError::NotFound(p) => write!(f, "{} does not exist", p.display()),
            ListingError::NotADirectory(p) => write!(f, "{} is not a directory", p.display()),
            ListingError::Io(p, e) => write!(f, "cannot read {}: {}", p.display(), e),
        }
    }
}

impl std::error::Error for ListingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Checks that `dir` exists and is a directory.
pub fn ensure_directory(dir: &Path) -> Result<(), ListingError> {
    match dir.metadata() {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ListingError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ListingError::NotFound(dir.to_path_buf()))
        }
        Err(e) => Err(ListingError::Io(dir.to_path_buf(), e)),
    }
}

/// Lists the direct children of `dir` (files and subdirectories alike),
/// sorted by file name so every run sees the same order.
pub fn list_directory(dir: &Path) -> Result<Vec<DirectoryEntry>, ListingError> {
    ensure_directory(dir)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let err = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("directory walk failed"));
            ListingError::Io(dir.to_path_buf(), err)
        })?;

        let path = entry.path().to_path_buf();
        entries.push(DirectoryEntry {
            display_name: entry.file_name().to_string_lossy().into_owned(),
            file_name: entry.file_name().to_os_string(),
            is_file: path.is_file(),
            path,
        });
    }

    tracing::debug!("listed {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Splits a file name into base name and extension. The extension keeps its
/// leading dot and is empty when there is none. Leading dots belong to the
/// base name, so `.hidden` has no extension.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let Some(dot) = file_name.rfind('.') else {
        return (file_name, "");
    };

    if file_name[..dot].chars().all(|c| c == '.') {
        return (file_name, "");
    }

    file_name.split_at(dot)
}
