//! Directory listing for page discovery.
//!
//! Listings use `glob` patterns rooted at an escaped directory path. Hidden
//! entries (leading dot) never match. Results are in natural order of their
//! file names.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use quire_config::ExtensionsConfig;

use crate::asset::AssetCategory;
use crate::error::SiteError;
use crate::natural;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// List entries of `dir` matching `file_pattern`, in natural order.
fn list(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>, SiteError> {
    let pattern = format!(
        "{}/{file_pattern}",
        Pattern::escape(&dir.to_string_lossy())
    );

    let entries = glob::glob_with(&pattern, MATCH_OPTIONS).map_err(|source| {
        SiteError::Pattern {
            pattern: pattern.clone(),
            source,
        }
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable entry");
                None
            }
        })
        .collect();

    natural::sort_by_file_name(&mut paths);
    Ok(paths)
}

/// List files of `dir` with any of `extensions`, in natural order.
fn list_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, SiteError> {
    let mut files = Vec::new();
    for extension in extensions {
        let escaped = Pattern::escape(extension);
        files.extend(
            list(dir, &format!("*.{escaped}"))?
                .into_iter()
                .filter(|path| path.is_file()),
        );
    }
    natural::sort_by_file_name(&mut files);
    files.dedup();
    Ok(files)
}

/// True if `path` is an asset sidecar such as `photo.jpg.md`.
fn is_sidecar(path: &Path, extensions: &ExtensionsConfig) -> bool {
    let Some(stem) = path.file_stem() else {
        return false;
    };
    let Some(inner) = Path::new(stem).extension() else {
        return false;
    };
    let inner = inner.to_string_lossy();
    extensions.assets().any(|ext| ext == inner)
}

/// The content file that makes `dir` a page.
///
/// The first content file in natural order wins; asset sidecars are ignored.
pub(crate) fn content_file(
    dir: &Path,
    extensions: &ExtensionsConfig,
) -> Result<Option<PathBuf>, SiteError> {
    Ok(list_files(dir, &extensions.content)?
        .into_iter()
        .find(|path| !is_sidecar(path, extensions)))
}

/// Subdirectories of `dir` in natural order.
///
/// Symlinked directories are not followed.
pub(crate) fn child_directories(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    Ok(list(dir, "*")?
        .into_iter()
        .filter(|path| match std::fs::symlink_metadata(path) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                tracing::debug!(path = %path.display(), "Skipping symlinked entry");
                false
            }
            Ok(metadata) => metadata.is_dir(),
            Err(_) => false,
        })
        .collect())
}

/// Asset files of one category in `dir`, in natural order.
pub(crate) fn asset_files(
    dir: &Path,
    category: AssetCategory,
    extensions: &ExtensionsConfig,
) -> Result<Vec<PathBuf>, SiteError> {
    list_files(dir, category.extensions(extensions))
}

/// Sidecar content file of `asset`: the first existing
/// `<file name>.<content ext>` in natural order.
pub(crate) fn sidecar(asset: &Path, extensions: &ExtensionsConfig) -> Option<PathBuf> {
    let file_name = asset.file_name()?.to_string_lossy();
    let mut candidates: Vec<PathBuf> = extensions
        .content
        .iter()
        .map(|ext| asset.with_file_name(format!("{file_name}.{ext}")))
        .filter(|path| path.is_file())
        .collect();
    natural::sort_by_file_name(&mut candidates);
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_content_file_ignores_sidecars() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("a.gif.md"), "Title: Sidecar").unwrap();
        fs::write(temp_dir.path().join("page.md"), "Title: Page").unwrap();

        let found = content_file(temp_dir.path(), &ExtensionsConfig::default()).unwrap();

        assert_eq!(found, Some(temp_dir.path().join("page.md")));
    }

    #[test]
    fn test_content_file_first_in_natural_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("post10.md"), "").unwrap();
        fs::write(temp_dir.path().join("post2.md"), "").unwrap();

        let found = content_file(temp_dir.path(), &ExtensionsConfig::default()).unwrap();

        assert_eq!(found, Some(temp_dir.path().join("post2.md")));
    }

    #[test]
    fn test_content_file_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let found = content_file(temp_dir.path(), &ExtensionsConfig::default()).unwrap();

        assert_eq!(found, None);
    }

    #[test]
    fn test_child_directories_natural_order_skips_hidden_and_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        for dir in ["2-x", "10-y", "1-z", ".git"] {
            fs::create_dir(temp_dir.path().join(dir)).unwrap();
        }
        fs::write(temp_dir.path().join("3-file"), "").unwrap();

        let dirs = child_directories(temp_dir.path()).unwrap();

        assert_eq!(names(&dirs), vec!["1-z", "2-x", "10-y"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_child_directories_skip_symlinks() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("1-real")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("2-loop")).unwrap();

        let dirs = child_directories(temp_dir.path()).unwrap();

        assert_eq!(dirs, vec![temp_dir.path().join("1-real")]);
    }

    #[test]
    fn test_asset_files_by_category() {
        let temp_dir = tempfile::tempdir().unwrap();
        for file in ["b.png", "a.gif", "clip.mp4", "a.gif.md", "page.md"] {
            fs::write(temp_dir.path().join(file), "").unwrap();
        }
        let extensions = ExtensionsConfig::default();

        let images = asset_files(temp_dir.path(), AssetCategory::Images, &extensions).unwrap();
        let videos = asset_files(temp_dir.path(), AssetCategory::Videos, &extensions).unwrap();
        let sounds = asset_files(temp_dir.path(), AssetCategory::Sounds, &extensions).unwrap();

        assert_eq!(names(&images), vec!["a.gif", "b.png"]);
        assert_eq!(names(&videos), vec!["clip.mp4"]);
        assert!(sounds.is_empty());
    }

    #[test]
    fn test_sidecar_lookup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let image = temp_dir.path().join("1-a.gif");
        fs::write(&image, "").unwrap();
        fs::write(temp_dir.path().join("1-a.gif.md"), "Title: Spacer").unwrap();
        let other = temp_dir.path().join("b.gif");
        fs::write(&other, "").unwrap();
        let extensions = ExtensionsConfig::default();

        assert_eq!(
            sidecar(&image, &extensions),
            Some(temp_dir.path().join("1-a.gif.md"))
        );
        assert_eq!(sidecar(&other, &extensions), None);
    }

    #[test]
    fn test_directory_with_glob_metacharacters() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("[draft]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("page.md"), "").unwrap();

        let found = content_file(&dir, &ExtensionsConfig::default()).unwrap();

        assert_eq!(found, Some(dir.join("page.md")));
    }
}
