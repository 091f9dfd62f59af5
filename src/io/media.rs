// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image loading and directory listing.
//!
//! This module handles discovering the images to annotate, decoding them,
//! and exposing the small set of image operations the rest of the
//! application needs: dimensions, raw pixels for display, transport
//! encoding for the inference client and rectangle drawing.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// File extensions recognised as annotatable images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Sorted list of images in one directory.
#[derive(Debug, Clone)]
pub struct ImageSource {
    images: Vec<PathBuf>,
}

impl ImageSource {
    /// List the images in `root`, sorted by file name.
    pub fn open(root: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(root)
            .with_context(|| format!("Failed to read image directory {}", root.display()))?;

        let mut images = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_image_file(&path) {
                images.push(path);
            }
        }
        images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        log::info!("Found {} images in {}", images.len(), root.display());

        Ok(Self { images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.images.get(index).map(PathBuf::as_path)
    }
}

/// Check the extension against [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

const MAX_STROKE: u32 = 1 << 12;

/// A decoded image held as RGBA pixels.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pixels: RgbaImage,
}

impl ImageHandle {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// PNG-encode the image and return it as base64 text.
    pub fn encode_for_transport(&self) -> Result<String> {
        let mut buffer = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buffer, ImageFormat::Png)
            .context("Failed to encode image as PNG")?;
        Ok(BASE64.encode(buffer.into_inner()))
    }

    /// Draw an outlined rectangle covering `(left, top)` to `(right, bottom)`
    /// inclusive, with the stroke growing inwards from that edge.
    ///
    /// Corners are reordered. Corners far outside the image are pulled in to
    /// just beyond the border, so edges off the canvas stay invisible.
    pub fn draw_rectangle(
        &mut self,
        (left, top): (i32, i32),
        (right, bottom): (i32, i32),
        color: [u8; 4],
        stroke_width: u32,
    ) {
        let stroke = stroke_width.clamp(1, MAX_STROKE) as i32;
        let clip = |v: i32, dim: u32| v.clamp(-stroke, dim as i32 + stroke);
        let (x_min, x_max) = (clip(left.min(right), self.width()), clip(left.max(right), self.width()));
        let (y_min, y_max) = (clip(top.min(bottom), self.height()), clip(top.max(bottom), self.height()));

        for i in 0..stroke {
            let width = x_max - x_min + 1 - 2 * i;
            let height = y_max - y_min + 1 - 2 * i;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(x_min + i, y_min + i).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut self.pixels, rect, Rgba(color));
        }
    }

    /// Save the image, picking the format from the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.pixels
            .save(path)
            .with_context(|| format!("Failed to save image {}", path.display()))?;
        Ok(())
    }
}

/// Load an image file and convert it to RGBA.
pub fn load_image(path: &Path) -> Result<ImageHandle> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;
    Ok(ImageHandle::from_rgba(img.to_rgba8()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn pixel_at(image: &ImageHandle, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * image.width() + x) * 4) as usize;
        image.as_raw()[i..i + 4].try_into().unwrap()
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::new(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn test_lists_only_images_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 4, 4);
        write_png(dir.path(), "a.PNG", 4, 4);
        std::fs::write(dir.path().join("a_bbox.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let source = ImageSource::open(dir.path()).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.get(0).unwrap().file_name().unwrap(), "a.PNG");
        assert_eq!(source.get(1).unwrap().file_name().unwrap(), "b.png");
        assert!(source.get(2).is_none());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSource::open(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_load_reports_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "frame.png", 32, 16);
        let image = load_image(&path).unwrap();
        assert_eq!((image.width(), image.height()), (32, 16));
        assert_eq!(image.as_raw().len(), 32 * 16 * 4);
    }

    #[test]
    fn test_transport_encoding_is_png() {
        let image = ImageHandle::from_rgba(RgbaImage::new(2, 2));
        let encoded = image.encode_for_transport().unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_draw_rectangle_outlines_only() {
        let mut image = ImageHandle::from_rgba(RgbaImage::new(20, 20));
        image.draw_rectangle((15, 15), (5, 5), [255, 0, 0, 255], 1);

        let red = [255, 0, 0, 255];
        assert_eq!(pixel_at(&image, 5, 5), red);
        assert_eq!(pixel_at(&image, 15, 15), red);
        assert_eq!(pixel_at(&image, 10, 10), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&image, 16, 16), [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_rectangle_clips_extreme_corners() {
        let mut image = ImageHandle::from_rgba(RgbaImage::new(20, 20));
        image.draw_rectangle((i32::MIN, 4), (i32::MAX, 8), [255, 0, 0, 255], 2);

        assert_eq!(pixel_at(&image, 10, 4), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&image, 10, 7), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&image, 0, 6), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&image, 19, 6), [0, 0, 0, 0]);
    }
}
