// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! A [`CanvasSession`] walks a directory of images in filename order and
//! owns everything tied to the image on screen: the decoded pixels, the
//! coordinate mapper for its size, the boxes drawn so far and the
//! press/drag/release state of the pointer.
//!
//! Only [`CanvasSession::commit`] persists boxes. Moving with
//! [`CanvasSession::next`] or [`CanvasSession::previous`] drops anything
//! drawn since the image was loaded.

use super::bbox::{BoxCollection, NormalizedBox, PixelBox, PixelPoint};
use crate::io::media::{self, ImageHandle, ImageSource};
use crate::io::serialization::BoxStore;
use crate::util::geometry::CoordinateMapper;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Pointer state while drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing { start: PixelPoint, current: PixelPoint },
}

/// The image currently being annotated.
struct ActiveImage {
    path: PathBuf,
    image: ImageHandle,
    mapper: CoordinateMapper,
    boxes: BoxCollection,
}

impl ActiveImage {
    fn load(path: &Path, store: &BoxStore) -> Result<Self> {
        let image = media::load_image(path)?;
        let mapper = CoordinateMapper::new(image.width(), image.height())?;
        let boxes = store.load(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            image,
            mapper,
            boxes,
        })
    }
}

/// Interactive annotation over one image directory.
pub struct CanvasSession {
    source: ImageSource,
    store: BoxStore,
    index: usize,
    active: ActiveImage,
    state: DrawState,
}

impl CanvasSession {
    /// Open `dir` and activate its first image.
    pub fn open(dir: &Path, store: BoxStore) -> Result<Self> {
        let source = ImageSource::open(dir)?;
        let Some(first) = source.get(0) else {
            bail!("No images found in {}", dir.display());
        };
        let active = ActiveImage::load(first, &store)?;
        log::info!(
            "Opened {} ({}x{}, {} saved boxes)",
            first.display(),
            active.image.width(),
            active.image.height(),
            active.boxes.len()
        );

        Ok(Self {
            source,
            store,
            index: 0,
            active,
            state: DrawState::Idle,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image_count(&self) -> usize {
        self.source.len()
    }

    pub fn image_path(&self) -> &Path {
        &self.active.path
    }

    pub fn image(&self) -> &ImageHandle {
        &self.active.image
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.active.mapper
    }

    pub fn boxes(&self) -> &BoxCollection {
        &self.active.boxes
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn store(&self) -> &BoxStore {
        &self.store
    }

    /// Rectangle being dragged out, if any.
    pub fn provisional(&self) -> Option<PixelBox> {
        match self.state {
            DrawState::Idle => None,
            DrawState::Drawing { start, current } => Some(PixelBox::from_corners(start, current)),
        }
    }

    /// Pointer pressed at pixel `(x, y)`.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        let start = self.active.mapper.clamp(x, y);
        self.state = DrawState::Drawing {
            start,
            current: start,
        };
    }

    /// Pointer moved to `(x, y)` with the button held.
    pub fn drag(&mut self, x: f64, y: f64) {
        match &mut self.state {
            DrawState::Drawing { current, .. } => *current = self.active.mapper.clamp(x, y),
            DrawState::Idle => log::debug!("Ignoring drag without a press"),
        }
    }

    /// Pointer released at `(x, y)`: commit the box to the collection.
    ///
    /// Zero-area and inverted boxes are kept as drawn.
    pub fn end_drag(&mut self, x: f64, y: f64) -> Option<NormalizedBox> {
        let DrawState::Drawing { start, .. } = self.state else {
            log::debug!("Ignoring release without a press");
            return None;
        };
        self.state = DrawState::Idle;

        let end = self.active.mapper.clamp(x, y);
        let bbox = self
            .active
            .mapper
            .to_normalized(&PixelBox::from_corners(start, end));
        self.active.boxes.push(bbox);
        log::info!(
            "Added box ({:.3}, {:.3}, {:.3}, {:.3}), total: {}",
            bbox.x1,
            bbox.y1,
            bbox.x2,
            bbox.y2,
            self.active.boxes.len()
        );
        Some(bbox)
    }

    /// Drop the newest box, or clear when at most one remains.
    pub fn undo(&mut self) {
        self.active.boxes.undo();
        log::info!("Undo, {} boxes remain", self.active.boxes.len());
    }

    /// Save the current boxes, clear them and move to the next image.
    ///
    /// On the last image the session stays put with an empty collection.
    /// If the next image fails to load, the saved boxes stay in memory so a
    /// retry writes them again rather than an empty list.
    pub fn commit(&mut self) -> Result<()> {
        self.store
            .save(&self.active.path, &self.active.boxes)
            .context("Failed to save annotations")?;
        log::info!(
            "Saved {:?} to {}",
            self.active
                .boxes
                .iter()
                .map(|b| b.to_array())
                .collect::<Vec<_>>(),
            self.store.annotation_path(&self.active.path).display()
        );

        let saved = std::mem::take(&mut self.active.boxes);
        self.state = DrawState::Idle;
        if let Err(e) = self.next() {
            self.active.boxes = saved;
            return Err(e.context("Annotations saved, but the next image failed to load"));
        }
        Ok(())
    }

    /// Move to the next image, discarding uncommitted boxes.
    pub fn next(&mut self) -> Result<()> {
        if self.index + 1 < self.source.len() {
            self.go_to(self.index + 1)?;
        }
        Ok(())
    }

    /// Move to the previous image, discarding uncommitted boxes.
    pub fn previous(&mut self) -> Result<()> {
        if self.index > 0 {
            self.go_to(self.index - 1)?;
        }
        Ok(())
    }

    /// Activate image `index`. The session is unchanged if loading fails.
    fn go_to(&mut self, index: usize) -> Result<()> {
        let Some(path) = self.source.get(index) else {
            bail!("Image index {} out of range", index);
        };
        let active = ActiveImage::load(path, &self.store)?;
        log::info!(
            "Image {}/{}: {} ({} saved boxes)",
            index + 1,
            self.source.len(),
            path.display(),
            active.boxes.len()
        );

        self.active = active;
        self.index = index;
        self.state = DrawState::Idle;
        Ok(())
    }
}
