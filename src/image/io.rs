//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{StereoError, StereoResult};
use std::path::Path;

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> StereoResult<OwnedImage<u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Loads an image from disk and converts it to an owned grayscale image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> StereoResult<OwnedImage<u8>> {
    let img = image::open(path).map_err(|err| StereoError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_gray_image(&img.to_luma8())
}

/// Loads a validity mask; any non-zero gray level marks a valid pixel.
pub fn load_mask<P: AsRef<Path>>(path: P) -> StereoResult<OwnedImage<u8>> {
    let gray = load_gray_image(path)?;
    let data = gray.data().iter().map(|&v| u8::from(v != 0)).collect();
    OwnedImage::new(data, gray.width(), gray.height())
}

/// Writes an 8-bit grayscale image to disk; the format follows the extension.
pub fn save_gray_image<P: AsRef<Path>>(img: &image::GrayImage, path: P) -> StereoResult<()> {
    img.save(path).map_err(|err| StereoError::ImageIo {
        reason: err.to_string(),
    })
}
