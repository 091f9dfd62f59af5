// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the mapping between pixel coordinates and
//! normalized coordinates for one image, plus input clamping.

use crate::models::bbox::{NormalizedBox, PixelBox, PixelPoint};
use anyhow::{bail, Result};

/// Converts boxes between pixel space and normalized space for one image size.
///
/// Must be rebuilt whenever the active image changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
}

impl CoordinateMapper {
    /// Bind a mapper to an image size. Fails on a zero dimension.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Cannot map coordinates for a {}x{} image", width, height);
        }
        Ok(Self {
            width: width as f64,
            height: height as f64,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Convert a pixel box to normalized coordinates.
    pub fn to_normalized(&self, pixel: &PixelBox) -> NormalizedBox {
        NormalizedBox::new(
            pixel.x1 / self.width,
            pixel.y1 / self.height,
            pixel.x2 / self.width,
            pixel.y2 / self.height,
        )
    }

    /// Convert a normalized box to pixel coordinates.
    pub fn to_pixel(&self, bbox: &NormalizedBox) -> PixelBox {
        PixelBox::new(
            bbox.x1 * self.width,
            bbox.y1 * self.height,
            bbox.x2 * self.width,
            bbox.y2 * self.height,
        )
    }

    /// Clamp a pointer position to `[0, width] x [0, height]`.
    pub fn clamp(&self, x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &PixelBox, b: &PixelBox) {
        for (l, r) in [(a.x1, b.x1), (a.y1, b.y1), (a.x2, b.x2), (a.y2, b.y2)] {
            assert!((l - r).abs() < 0.0001, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        for (width, height) in [(1920, 1080), (1, 1), (333, 7), (640, 4096)] {
            let mapper = CoordinateMapper::new(width, height).unwrap();
            let pixel = PixelBox::new(
                width as f64 * 0.3,
                height as f64 * 0.9,
                width as f64,
                0.0,
            );
            let normalized = mapper.to_normalized(&pixel);
            assert_close(&mapper.to_pixel(&normalized), &pixel);
        }
    }

    #[test]
    fn test_normalize_corners() {
        let mapper = CoordinateMapper::new(1920, 1080).unwrap();

        let bbox = mapper.to_normalized(&PixelBox::new(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(bbox, NormalizedBox::new(0.0, 0.0, 1.0, 1.0));

        let centre = mapper.to_normalized(&PixelBox::new(960.0, 540.0, 960.0, 540.0));
        assert_eq!(centre.x1, 0.5);
        assert_eq!(centre.y2, 0.5);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert!(CoordinateMapper::new(0, 100).is_err());
        assert!(CoordinateMapper::new(100, 0).is_err());
    }

    #[test]
    fn test_clamp_bounds_each_axis() {
        let mapper = CoordinateMapper::new(200, 100).unwrap();
        assert_eq!(mapper.clamp(-5.0, 150.0), PixelPoint::new(0.0, 100.0));
        assert_eq!(mapper.clamp(250.0, -1.0), PixelPoint::new(200.0, 0.0));
        assert_eq!(mapper.clamp(20.5, 30.5), PixelPoint::new(20.5, 30.5));
    }

    #[test]
    fn test_mapper_does_not_clamp() {
        let mapper = CoordinateMapper::new(100, 100).unwrap();
        let bbox = mapper.to_normalized(&PixelBox::new(-10.0, 0.0, 150.0, 50.0));
        assert_eq!(bbox.x1, -0.1);
        assert_eq!(bbox.x2, 1.5);
    }
}
