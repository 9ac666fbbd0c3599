//! Screenshot module
//!
//! Finds the images in a screenshots directory and decodes thumbnails.

use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// RGBA thumbnail pixels
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A screenshot found on disk
#[derive(Debug, Clone)]
pub struct ScreenshotEntry {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("Failed to read screenshots directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Whether `path` has an image file extension
pub fn is_image_file(path: &Path) -> bool {
    path.is_file() && ImageFormat::from_path(path).is_ok()
}

/// Image files in `dir`, sorted by file name
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, ScreenshotError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| ScreenshotError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_image_file(path))
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Decode an image and scale it to fit within `max_edge` pixels
pub fn load_thumbnail(path: &Path, max_edge: u32) -> Result<ScreenshotEntry, ScreenshotError> {
    let decode_err = |source: image::ImageError| ScreenshotError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let img = image::ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    let rgba = img.thumbnail(max_edge, max_edge).to_rgba8();
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    Ok(ScreenshotEntry {
        path: path.to_path_buf(),
        size,
        thumbnail: Thumbnail {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        },
    })
}

/// Scan `dir`, handing each decoded screenshot to `on_entry` as soon as it
/// is ready. Files that fail to decode are skipped.
///
/// Returns the number of entries delivered.
pub fn scan(
    dir: &Path,
    max_edge: u32,
    mut on_entry: impl FnMut(ScreenshotEntry),
) -> Result<usize, ScreenshotError> {
    let mut count = 0;

    for path in list_images(dir)? {
        match load_thumbnail(&path, max_edge) {
            Ok(entry) => {
                on_entry(entry);
                count += 1;
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }

    Ok(count)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    /// Write a small solid-colour PNG
    pub fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 90, 200, 255]));
        img.save(path).unwrap();
    }
}
