// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding box data structures.
//!
//! This module defines the canonical box representation shared by the
//! interactive annotator and the inference client, together with the
//! pixel-space types used while the user is drawing.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel space, relative to one image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in pixel space, only meaningful for one `(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PixelBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a box from the drag start and end corners.
    pub fn from_corners(start: PixelPoint, end: PixelPoint) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }
}

/// A bounding box in normalized coordinates (0.0 to 1.0).
///
/// Corners are stored as drawn: a drag released above or left of its start
/// produces an inverted box, and a click without drag a zero-area one.
/// Serializes as a bare `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct NormalizedBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl NormalizedBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Same rectangle with `(x1, y1)` as the top-left corner.
    pub fn ordered(&self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f64; 4]> for NormalizedBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<NormalizedBox> for [f64; 4] {
    fn from(bbox: NormalizedBox) -> Self {
        bbox.to_array()
    }
}

/// Ordered boxes drawn for one image, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxCollection {
    boxes: Vec<NormalizedBox>,
}

impl BoxCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed box.
    pub fn push(&mut self, bbox: NormalizedBox) {
        self.boxes.push(bbox);
    }

    /// Remove the most recent box, or clear everything when one or none remain.
    pub fn undo(&mut self) {
        if self.boxes.len() > 1 {
            self.boxes.pop();
        } else {
            self.boxes.clear();
        }
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedBox> {
        self.boxes.iter()
    }
}

impl From<Vec<NormalizedBox>> for BoxCollection {
    fn from(boxes: Vec<NormalizedBox>) -> Self {
        Self { boxes }
    }
}

impl<'a> IntoIterator for &'a BoxCollection {
    type Item = &'a NormalizedBox;
    type IntoIter = std::slice::Iter<'a, NormalizedBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
