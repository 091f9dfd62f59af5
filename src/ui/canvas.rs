// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! This module provides the main canvas area where users view the active
//! image and press-drag-release to draw bounding boxes. Pointer positions
//! are reported in image pixel coordinates, unclamped; the session clamps.

use crate::models::bbox::{PixelBox, PixelPoint};
use crate::models::session::{CanvasSession, DrawState};

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    BeginDrag(PixelPoint),
    Drag(PixelPoint),
    EndDrag(PixelPoint),
    /// Press and release seen in the same frame.
    Click(PixelPoint),
}

/// Map one frame of drag response flags to a canvas action.
fn drag_action(started: bool, dragged: bool, stopped: bool, at: PixelPoint) -> CanvasAction {
    match (started, stopped) {
        (true, true) => CanvasAction::Click(at),
        (true, false) => CanvasAction::BeginDrag(at),
        (false, true) => CanvasAction::EndDrag(at),
        (false, false) if dragged => CanvasAction::Drag(at),
        (false, false) => CanvasAction::None,
    }
}

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: Option<&CanvasSession>,
    image_texture: &Option<egui::TextureHandle>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(session), Some(texture)) = (session, image_texture) else {
            show_welcome(ui);
            return;
        };

        let img_width = session.mapper().width() as f32;
        let img_height = session.mapper().height() as f32;

        // Calculate scaling to fit the image in the available space
        let available = ui.available_size();
        let img_aspect = img_width / img_height;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            // Image is wider - fit to width
            (available.x, available.x / img_aspect)
        } else {
            // Image is taller - fit to height
            (available.y * img_aspect, available.y)
        };

        // Center the image
        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );
        let scale = display_width / img_width;

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let to_pixel = |pos: egui::Pos2| {
            PixelPoint::new(
                ((pos.x - image_rect.min.x) / scale) as f64,
                ((pos.y - image_rect.min.y) / scale) as f64,
            )
        };

        let response = ui.allocate_rect(image_rect, egui::Sense::drag());
        let pointer = ui.input(|i| i.pointer.latest_pos());

        if let Some(pos) = pointer {
            action = drag_action(
                response.drag_started(),
                response.dragged(),
                response.drag_stopped(),
                to_pixel(pos),
            );
        }

        let to_screen = |pixel: &PixelBox| {
            egui::Rect::from_two_pos(
                image_rect.min + egui::vec2(pixel.x1 as f32, pixel.y1 as f32) * scale,
                image_rect.min + egui::vec2(pixel.x2 as f32, pixel.y2 as f32) * scale,
            )
        };

        // Draw committed boxes on top of the image
        let painter = ui.painter();
        for bbox in session.boxes() {
            let rect = to_screen(&session.mapper().to_pixel(bbox));
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));
        }

        // Draw the box being dragged out
        if let Some(provisional) = session.provisional() {
            painter.rect_stroke(
                to_screen(&provisional),
                0.0,
                egui::Stroke::new(2.0, egui::Color32::LIGHT_RED),
            );
        }
    });

    // Display position info at the bottom
    ui.separator();
    ui.horizontal(|ui| match session {
        Some(session) => {
            let name = session
                .image_path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "Image {}/{}: {}",
                session.index() + 1,
                session.image_count(),
                name
            ));
            ui.separator();
            ui.label(format!("{} boxes", session.boxes().len()));
            if matches!(session.state(), DrawState::Drawing { .. }) {
                ui.separator();
                ui.label("Drawing");
            }
            ui.separator();
            let annotation_path = session.store().annotation_path(session.image_path());
            ui.label(
                egui::RichText::new(format!("Saves to {}", annotation_path.display())).weak(),
            );
        }
        None => {
            ui.label("No folder loaded");
        }
    });

    action
}

/// Welcome message shown before a folder is opened.
fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("BBMaker")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Bounding Box Maker")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image folder to begin annotating")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Folder...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_in_one_frame_is_a_click() {
        let at = PixelPoint::new(12.0, 7.0);
        assert_eq!(drag_action(true, true, true, at), CanvasAction::Click(at));
        assert_eq!(drag_action(true, false, true, at), CanvasAction::Click(at));
    }

    #[test]
    fn test_drag_phases() {
        let at = PixelPoint::new(3.0, 4.0);
        assert_eq!(drag_action(true, true, false, at), CanvasAction::BeginDrag(at));
        assert_eq!(drag_action(false, true, false, at), CanvasAction::Drag(at));
        assert_eq!(drag_action(false, false, true, at), CanvasAction::EndDrag(at));
        assert_eq!(drag_action(false, false, false, at), CanvasAction::None);
    }
}
