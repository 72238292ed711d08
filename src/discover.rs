//! Image discovery
//!
//! Finds the images to convert, either directly inside a folder or matching
//! a glob pattern. Only PNG and JPEG files are picked up.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::{Error, Result};

/// File extensions accepted as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// A deduplicated, sorted set of image paths
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    /// Folder or pattern the images were discovered from
    pub source: String,
    paths: Vec<PathBuf>,
}

impl ImageSet {
    /// Build a set from arbitrary paths, deduplicating and sorting them
    pub fn from_paths(source: impl Into<String>, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let unique: BTreeSet<PathBuf> = paths.into_iter().collect();
        Self {
            source: source.into(),
            paths: unique.into_iter().collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Human readable summary, e.g. "12 images found."
    pub fn status_line(&self) -> String {
        match self.paths.len() {
            1 => "1 image found.".to_string(),
            n => format!("{} images found.", n),
        }
    }
}

/// Check whether a path has one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List the images directly inside `folder` (subfolders are not searched)
pub fn discover_images(folder: &Path) -> Result<ImageSet> {
    if !folder.is_dir() {
        return Err(Error::FolderNotFound(folder.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        }
    }

    log::debug!("{} candidate images in {}", paths.len(), folder.display());
    Ok(ImageSet::from_paths(folder.display().to_string(), paths))
}

/// Expand a glob pattern, keeping only supported image files
pub fn expand_pattern(pattern: &str) -> Result<ImageSet> {
    let entries = glob(pattern).map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && is_supported_image(&path) {
                    paths.push(path);
                }
            }
            Err(e) => log::warn!("glob error for {}: {}", pattern, e),
        }
    }

    Ok(ImageSet::from_paths(pattern, paths))
}

/// Resolve a command-line source
///
/// An existing directory always wins, even if its name contains glob
/// characters (e.g. `Trip [2024]`). Otherwise glob characters mean a pattern.
pub fn resolve_source(source: &str) -> Result<ImageSet> {
    if Path::new(source).is_dir() {
        return discover_images(Path::new(source));
    }
    if source.contains('*') || source.contains('?') || source.contains('[') {
        expand_pattern(source)
    } else {
        discover_images(Path::new(source))
    }
}
