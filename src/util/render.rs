// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing boxes back onto images.

use crate::io::media::ImageHandle;
use crate::models::bbox::NormalizedBox;
use crate::util::geometry::CoordinateMapper;
use anyhow::Result;

/// Outlines normalized boxes on an image at a fixed colour and stroke.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub color: [u8; 4],
    pub stroke_width: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            color: [255, 0, 0, 255],
            stroke_width: 3,
        }
    }
}

impl Renderer {
    /// Draw every box onto `image`, corners ordered and truncated toward zero.
    pub fn draw<'a>(
        &self,
        image: &mut ImageHandle,
        boxes: impl IntoIterator<Item = &'a NormalizedBox>,
    ) -> Result<()> {
        let mapper = CoordinateMapper::new(image.width(), image.height())?;
        for bbox in boxes {
            let pixel = mapper.to_pixel(&bbox.ordered());
            image.draw_rectangle(
                (pixel.x1 as i32, pixel.y1 as i32),
                (pixel.x2 as i32, pixel.y2 as i32),
                self.color,
                self.stroke_width,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::parser::ResponseParser;
    use crate::io::media::tests::pixel_at;
    use image::RgbaImage;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLANK: [u8; 4] = [0, 0, 0, 0];

    #[test]
    fn test_draws_outline_in_pixel_space() {
        let mut image = ImageHandle::from_rgba(RgbaImage::new(100, 50));
        let boxes = vec![NormalizedBox::new(0.2, 0.2, 0.6, 0.8)];
        Renderer { color: RED, stroke_width: 1 }.draw(&mut image, &boxes).unwrap();

        assert_eq!(pixel_at(&image, 20, 10), RED);
        assert_eq!(pixel_at(&image, 60, 40), RED);
        assert_eq!(pixel_at(&image, 40, 25), BLANK);
        assert_eq!(pixel_at(&image, 61, 41), BLANK);
    }

    #[test]
    fn test_stroke_grows_inwards() {
        let mut image = ImageHandle::from_rgba(RgbaImage::new(100, 100));
        let boxes = vec![NormalizedBox::new(0.5, 0.5, 0.9, 0.9)];
        Renderer::default().draw(&mut image, &boxes).unwrap();

        assert_eq!(pixel_at(&image, 50, 60), RED);
        assert_eq!(pixel_at(&image, 52, 60), RED);
        assert_eq!(pixel_at(&image, 53, 60), BLANK);
        assert_eq!(pixel_at(&image, 49, 60), BLANK);
        assert_eq!(pixel_at(&image, 90, 60), RED);
    }

    #[test]
    fn test_huge_parsed_coordinates_are_clipped() {
        let boxes = ResponseParser::new().unwrap().parse("[0, 0, 99999999, 0.5]");
        let mut image = ImageHandle::from_rgba(RgbaImage::new(100, 100));
        Renderer::default().draw(&mut image, &boxes).unwrap();

        assert_eq!(pixel_at(&image, 0, 25), RED);
        assert_eq!(pixel_at(&image, 50, 0), RED);
        assert_eq!(pixel_at(&image, 50, 50), RED);
        assert_eq!(pixel_at(&image, 99, 25), BLANK);
        assert_eq!(pixel_at(&image, 50, 25), BLANK);
    }

    #[test]
    fn test_inverted_and_degenerate_boxes_are_drawn() {
        let mut image = ImageHandle::from_rgba(RgbaImage::new(10, 10));
        let boxes = vec![
            NormalizedBox::new(0.8, 0.8, 0.2, 0.2),
            NormalizedBox::new(0.5, 0.5, 0.5, 0.5),
        ];
        Renderer { color: RED, stroke_width: 1 }.draw(&mut image, &boxes).unwrap();

        assert_eq!(pixel_at(&image, 2, 2), RED);
        assert_eq!(pixel_at(&image, 5, 5), RED);
    }

    #[test]
    fn test_empty_collection_leaves_image_untouched() {
        let mut image = ImageHandle::from_rgba(RgbaImage::new(4, 4));
        Renderer::default().draw(&mut image, &Vec::<NormalizedBox>::new()).unwrap();
        assert!(image.as_raw().iter().all(|&b| b == 0));
    }
}
