//! Writing the generated module to disk.
//!
//! The module is first written next to its destination and then renamed
//! over it, so an interrupted run never leaves a truncated client behind.
//! Regenerating identical text leaves the existing file untouched.

use anyhow::{Context, Result};
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// What [`write_module`] did with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist or held different text
    Written,
    /// The file already held exactly this text
    Unchanged,
}

/// Sibling path the module is staged at before the rename
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes the generated module to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns an error if the directory, the staging file or the rename fails.
/// The staging file is removed when the rename fails.
pub fn write_module(content: &str, path: &Path) -> Result<WriteOutcome> {
    if fs::read(path).is_ok_and(|existing| existing == content.as_bytes()) {
        info!("{} is up to date", path.display());
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let staging = staging_path(path);
    debug!("Staging {} bytes at {}", content.len(), staging.display());
    fs::write(&staging, content)
        .with_context(|| format!("Failed to write to file: {}", staging.display()))?;

    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(err).with_context(|| format!("Failed to replace file: {}", path.display()));
    }

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_module() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("api.py");
        let content = "class FitbitWebApi: ...\n";

        assert_eq!(write_module(content, &file_path).unwrap(), WriteOutcome::Written);

        assert_eq!(fs::read_to_string(&file_path).unwrap(), content);
        assert!(!staging_path(&file_path).exists());
    }

    #[test]
    fn test_write_module_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("fitbit_web").join("api.py");

        write_module("x = 1\n", &file_path).unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_write_module_replaces_changed_text() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("api.py");

        write_module("old\n", &file_path).unwrap();
        assert_eq!(write_module("new\n", &file_path).unwrap(), WriteOutcome::Written);

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new\n");
    }

    #[test]
    fn test_write_module_skips_identical_text() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("api.py");

        write_module("same\n", &file_path).unwrap();
        assert_eq!(write_module("same\n", &file_path).unwrap(), WriteOutcome::Unchanged);
    }

    #[test]
    fn test_failed_rename_leaves_no_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file
        let file_path = temp_dir.path().join("api.py");
        fs::create_dir_all(file_path.join("occupied")).unwrap();

        assert!(write_module("x = 1\n", &file_path).is_err());
        assert!(!staging_path(&file_path).exists());
    }

    #[test]
    fn test_staging_path_is_a_hidden_sibling() {
        let path = Path::new("fitbit_web/api.py");
        assert_eq!(staging_path(path), Path::new("fitbit_web/.api.py.tmp"));
    }
}
