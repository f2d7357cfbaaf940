//! # Output
//!
//! Saving rendered labels and sheets, and clearing the output directory
//! between runs.

use image::GrayImage;
use std::fs;
use std::path::Path;

use crate::error::LabelError;

/// Save an image as PNG, creating parent directories as needed.
pub fn save_png(image: &GrayImage, path: impl AsRef<Path>) -> Result<(), LabelError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| {
            LabelError::Image(format!("Failed to save PNG {}: {}", path.display(), e))
        })?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "saved PNG"
    );
    Ok(())
}

/// Remove everything inside `dir`, keeping the directory itself.
///
/// Creates the directory when it does not exist. An entry that cannot be
/// removed is logged and skipped. Returns the number of entries removed.
pub fn clean_dir(dir: impl AsRef<Path>) -> Result<usize, LabelError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        tracing::info!(dir = %dir.display(), "output directory missing, creating it");
        fs::create_dir_all(dir)?;
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let result = if path.is_dir() && !path.is_symlink() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove"),
        }
    }

    tracing::info!(dir = %dir.display(), removed, "output directory cleared");
    Ok(removed)
}
