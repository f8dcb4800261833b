use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// How the scanned sequence is ordered before it is paged.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    /// Depth-first, lexical by file name within each directory.
    Traversal,
    /// Traversal order reversed.
    Reverse,
    /// Newest modification time first.
    Modified,
}

/// Recursively lists the images under `root` as `/`-separated paths relative to it.
///
/// Any walk error aborts the scan; nothing partial is returned.
pub fn scan_images(
    root: &Path,
    allowed_extensions: &HashSet<String>,
    order: ScanOrder,
) -> Result<Vec<String>, AppError> {
    log::debug!("Scanning {:?} for images", root);

    let mut found: Vec<(String, Option<SystemTime>)> = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            log::trace!("Skipping non-file entry: {:?}", entry.path());
            continue;
        }

        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| allowed_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false);
        if !is_image {
            log::trace!("Skipping file due to unsupported extension: {:?}", path);
            continue;
        }

        let modified = match order {
            ScanOrder::Modified => Some(entry.metadata()?.modified()?),
            _ => None,
        };
        found.push((relative_url_path(root, path)?, modified));
    }

    match order {
        ScanOrder::Traversal => {}
        ScanOrder::Reverse => found.reverse(),
        ScanOrder::Modified => found.sort_by(|a, b| b.1.cmp(&a.1)),
    }

    log::debug!("Found {} images under {:?}", found.len(), root);
    Ok(found.into_iter().map(|(path, _)| path).collect())
}

fn relative_url_path(root: &Path, path: &Path) -> Result<String, AppError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| AppError::Generic(format!("{:?} is outside {:?}: {}", path, root, e)))?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Creates `path` (and its parents) with mode 0755 unless it already exists.
pub fn ensure_directory(path: &Path) -> Result<(), AppError> {
    if path.is_dir() {
        return Ok(());
    }

    log::info!("Creating directory {:?}", path);
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)?;
    Ok(())
}
