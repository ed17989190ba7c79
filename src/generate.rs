use std::path::{Path, PathBuf};

use image::{ImageResult, Rgb, RgbImage};

pub const LANDSCAPE: (u32, u32) = (800, 600);
pub const PORTRAIT: (u32, u32) = (600, 800);

/// Path and size of the `index`-th (0-based) of `count` sample images.
///
/// The first half are landscape, the rest portrait.
pub fn test_image_spec(pool: &Path, index: usize, count: usize) -> (PathBuf, (u32, u32)) {
    let size = if index < count / 2 { LANDSCAPE } else { PORTRAIT };
    (pool.join(format!("test_image_{}.png", index + 1)), size)
}

/// Write a plain white PNG.
pub fn write_test_image(path: &Path, (width, height): (u32, u32)) -> ImageResult<()> {
    RgbImage::from_pixel(width, height, Rgb([255, 255, 255])).save(path)
}
