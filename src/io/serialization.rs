// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image annotation persistence.
//!
//! Each image `name.ext` gets a sibling file `name_bbox.json` (or
//! `name_bbox.yaml`) holding its boxes as an `[N, 4]` array of normalized
//! floats. Files are overwritten as a whole on every save; a crash mid-write
//! can leave a truncated file, which the next load reports as an error.

use crate::models::bbox::BoxCollection;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Suffix appended to the image stem to name its annotation file.
pub const ANNOTATION_SUFFIX: &str = "_bbox";

/// On-disk format for annotation files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AnnotationFormat {
    #[default]
    Json,
    Yaml,
}

impl AnnotationFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AnnotationFormat::Json => "json",
            AnnotationFormat::Yaml => "yaml",
        }
    }
}

/// Reads and writes the annotation file that sits next to each image.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxStore {
    format: AnnotationFormat,
}

impl BoxStore {
    pub fn new(format: AnnotationFormat) -> Self {
        Self { format }
    }

    /// Annotation file path for an image: `{dir}/{stem}_bbox.{ext}`.
    pub fn annotation_path(&self, image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{}{}.{}", stem, ANNOTATION_SUFFIX, self.format.extension());
        image_path.with_file_name(name)
    }

    /// Write `boxes` for `image_path`, replacing any previous file.
    pub fn save(&self, image_path: &Path, boxes: &BoxCollection) -> Result<()> {
        let path = self.annotation_path(image_path);
        let contents = match self.format {
            AnnotationFormat::Json => serde_json::to_string(boxes)?,
            AnnotationFormat::Yaml => serde_yaml::to_string(boxes)?,
        };
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write annotations to {}", path.display()))?;
        Ok(())
    }

    /// Read the boxes for `image_path`; an absent file yields an empty collection.
    pub fn load(&self, image_path: &Path) -> Result<BoxCollection> {
        let path = self.annotation_path(image_path);
        if !path.exists() {
            return Ok(BoxCollection::new());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read annotations from {}", path.display()))?;
        let boxes = match self.format {
            AnnotationFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Malformed annotation file {}", path.display()))?,
            AnnotationFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Malformed annotation file {}", path.display()))?,
        };
        Ok(boxes)
    }
}
