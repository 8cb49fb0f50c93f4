//! Output tree operations.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::BuildError;

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    |source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn create_parent(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(write_error(parent)),
        None => Ok(()),
    }
}

/// Write a rendered page, creating its directory.
pub(crate) fn write_page(path: &Path, contents: &str) -> Result<(), BuildError> {
    create_parent(path)?;
    fs::write(path, contents).map_err(write_error(path))
}

/// Copy an asset to its output path, creating its directory.
pub(crate) fn copy_asset(source: &Path, destination: &Path) -> Result<(), BuildError> {
    create_parent(destination)?;
    fs::copy(source, destination)
        .map(|_| ())
        .map_err(write_error(destination))
}

/// Remove the output directory. A missing directory is not an error.
pub fn clear_output(dir: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::debug!(path = %dir.display(), "Cleared output directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::Clear {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_page_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/b/a/index.html");

        write_page(&path, "<p>hi</p>").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_copy_asset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("a.gif");
        fs::write(&source, b"GIF89a").unwrap();
        let destination = temp_dir.path().join("out/a/a.gif");

        copy_asset(&source, &destination).unwrap();

        assert_eq!(fs::read(destination).unwrap(), b"GIF89a");
    }

    #[test]
    fn test_copy_missing_asset_fails() {
        let temp_dir = tempfile::tempdir().unwrap();

        let err = copy_asset(
            &temp_dir.path().join("missing.gif"),
            &temp_dir.path().join("out/missing.gif"),
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Write { .. }));
    }

    #[test]
    fn test_clear_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("output");
        fs::create_dir_all(output.join("stale")).unwrap();
        fs::write(output.join("stale/index.html"), "old").unwrap();

        clear_output(&output).unwrap();

        assert!(!output.exists());
    }

    #[test]
    fn test_clear_missing_output_is_ok() {
        let temp_dir = tempfile::tempdir().unwrap();

        clear_output(&temp_dir.path().join("never-built")).unwrap();
    }
}
