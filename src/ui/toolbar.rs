// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with navigation and editing buttons.

use crate::models::session::CanvasSession;

/// Button pressed in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Previous,
    Next,
    Undo,
    Commit,
}

/// Display the toolbar and report which button, if any, was clicked.
pub fn show(ui: &mut egui::Ui, session: Option<&CanvasSession>) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let loaded = session.is_some();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.add_enabled(loaded, egui::Button::new("◀ Previous")).clicked() {
            action = ToolbarAction::Previous;
        }
        if ui.add_enabled(loaded, egui::Button::new("Next ▶")).clicked() {
            action = ToolbarAction::Next;
        }

        ui.separator();

        let has_boxes = session.map(|s| !s.boxes().is_empty()).unwrap_or(false);
        if ui.add_enabled(has_boxes, egui::Button::new("↶ Undo")).clicked() {
            action = ToolbarAction::Undo;
        }
        if ui.add_enabled(loaded, egui::Button::new("✔ Save & Next")).clicked() {
            action = ToolbarAction::Commit;
        }

        ui.separator();

        ui.label(
            egui::RichText::new("Drag to draw a box | ←/→ navigate | Enter saves | Backspace undoes")
                .italics()
                .weak(),
        );
    });

    action
}
