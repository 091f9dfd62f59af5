// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the annotation session and forwards canvas, toolbar
//! and keyboard input to it, keeping the displayed texture in step with
//! the active image.

use crate::io::serialization::BoxStore;
use crate::models::session::CanvasSession;
use crate::ui::canvas::{self, CanvasAction};
use crate::ui::toolbar::{self, ToolbarAction};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Main application state.
pub struct BBMakerApp {
    /// Annotation session for the opened folder
    session: Option<CanvasSession>,

    /// Annotation file format used when opening folders
    store: BoxStore,

    /// Texture of the active image
    image_texture: Option<egui::TextureHandle>,

    /// Image the texture was created from
    texture_source: Option<PathBuf>,

    /// Last error shown to the user
    error_message: Option<String>,
}

impl BBMakerApp {
    /// Create the application, optionally opening `dir` straight away.
    pub fn new(store: BoxStore, dir: Option<PathBuf>) -> Self {
        let mut app = Self {
            session: None,
            store,
            image_texture: None,
            texture_source: None,
            error_message: None,
        };
        if let Some(dir) = dir {
            app.open_folder(&dir);
        }
        app
    }

    /// Start a new session over the images in `dir`.
    fn open_folder(&mut self, dir: &Path) {
        match CanvasSession::open(dir, self.store) {
            Ok(session) => {
                self.session = Some(session);
                self.error_message = None;
            }
            Err(e) => self.report("Failed to open folder", e),
        }
    }

    /// Apply a session transition, surfacing any error.
    fn apply(&mut self, what: &str, transition: impl FnOnce(&mut CanvasSession) -> Result<()>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match transition(session) {
            Ok(()) => self.error_message = None,
            Err(e) => self.report(what, e),
        }
    }

    fn report(&mut self, what: &str, error: anyhow::Error) {
        log::error!("{}: {:#}", what, error);
        self.error_message = Some(format!("{}: {:#}", what, error));
    }

    fn handle_toolbar(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Previous => self.apply("Failed to load image", CanvasSession::previous),
            ToolbarAction::Next => self.apply("Failed to load image", CanvasSession::next),
            ToolbarAction::Commit => self.apply("Save & Next failed", CanvasSession::commit),
            ToolbarAction::Undo => self.apply("Undo failed", |s| {
                s.undo();
                Ok(())
            }),
            ToolbarAction::None => {}
        }
    }

    fn handle_canvas(&mut self, action: CanvasAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match action {
            CanvasAction::BeginDrag(p) => session.begin_drag(p.x, p.y),
            CanvasAction::Drag(p) => session.drag(p.x, p.y),
            CanvasAction::EndDrag(p) => {
                session.end_drag(p.x, p.y);
            }
            CanvasAction::Click(p) => {
                session.begin_drag(p.x, p.y);
                session.end_drag(p.x, p.y);
            }
            CanvasAction::None => {}
        }
    }

    /// Recreate the texture when the active image changes.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(session) = self.session.as_ref() else {
            self.image_texture = None;
            self.texture_source = None;
            return;
        };
        if self.texture_source.as_deref() == Some(session.image_path()) {
            return;
        }

        let image = session.image();
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        self.image_texture = Some(ctx.load_texture(
            "active_image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));
        self.texture_source = Some(session.image_path().to_path_buf());
        log::debug!("Loaded texture for {}", session.image_path().display());
    }
}

impl eframe::App for BBMakerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_texture(ctx);

        let mut toolbar_action = ToolbarAction::None;

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Folder...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new()
                            .set_title("Select Image Directory")
                            .pick_folder()
                        {
                            self.open_folder(&dir);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("Undo (Backspace)").clicked() {
                        toolbar_action = ToolbarAction::Undo;
                        ui.close_menu();
                    }
                    if ui.button("Save & Next (Enter)").clicked() {
                        toolbar_action = ToolbarAction::Commit;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Navigate", |ui| {
                    if ui.button("Previous Image (←)").clicked() {
                        toolbar_action = ToolbarAction::Previous;
                        ui.close_menu();
                    }
                    if ui.button("Next Image (→)").clicked() {
                        toolbar_action = ToolbarAction::Next;
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let action = toolbar::show(ui, self.session.as_ref());
            if action != ToolbarAction::None {
                toolbar_action = action;
            }
        });

        if let Some(ref message) = self.error_message {
            egui::TopBottomPanel::bottom("error_bar").show(ctx, |ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, message);
            });
        }

        // Keyboard shortcuts
        if toolbar_action == ToolbarAction::None {
            toolbar_action = ctx.input(|i| {
                if i.key_pressed(egui::Key::ArrowLeft) {
                    ToolbarAction::Previous
                } else if i.key_pressed(egui::Key::ArrowRight) {
                    ToolbarAction::Next
                } else if i.key_pressed(egui::Key::Enter) {
                    ToolbarAction::Commit
                } else if i.key_pressed(egui::Key::Backspace) {
                    ToolbarAction::Undo
                } else {
                    ToolbarAction::None
                }
            });
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, self.session.as_ref(), &self.image_texture))
            .inner;

        self.handle_canvas(canvas_action);
        self.handle_toolbar(toolbar_action);
    }
}
