//! User interface components and rendering logic for the glob editor.
//!
//! This module contains all the UI-related code including the main
//! application struct, canvas rendering, and user interaction handling.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main GlobApp
//! - `canvas` - Canvas navigation, zooming, panning, and interaction
//! - `rendering` - Drawing nodes, globs, grid, and selection handles

mod canvas;
mod rendering;
mod state;

pub use state::{GlobApp, APP_STATE_KEY};

use crate::constants;
use crate::geometry::round_coord;
use crate::types::{Glob, GlobOptions, Node};
use crate::undo::{UndoAction, UndoableDocument};
use eframe::egui;

impl eframe::App for GlobApp {
    /// Persist entire app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string(APP_STATE_KEY, json);
            }
            Err(err) => {
                log::error!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// This method handles the overall UI layout: the top toolbar and the
    /// main canvas area, plus global keyboard shortcuts.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme visuals
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        // Handle undo/redo keyboard shortcuts
        self.handle_undo_redo_keys(ctx);

        // Handle delete key for removing selected objects
        self.handle_delete_key(ctx);

        // Top toolbar occupies full width
        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        // Central canvas area (below the toolbar)
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl GlobApp {
    /// Draws the main canvas and routes its input.
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Handle canvas panning with middle mouse button or Ctrl+drag
        self.handle_canvas_panning(ui, &response);

        // Handle scroll wheel zooming
        self.handle_canvas_zoom(ui, &response);

        // Handle selection, move drags, and resize gestures
        self.handle_canvas_interaction(ui, &response);

        let canvas_rect = response.rect;
        self.draw_grid(&painter, canvas_rect);
        self.draw_globs(&painter);
        self.draw_nodes(&painter);
        self.draw_selection_bounds(&painter);
    }

    /// Draws the top toolbar with document and view actions.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add Node").clicked() {
                self.create_node_at_view_center(ui);
            }

            let two_nodes = self.interaction.selection.nodes.len() == 2;
            if ui
                .add_enabled(two_nodes, egui::Button::new("Link Nodes"))
                .on_disabled_hover_text("Select exactly two nodes to link them with a glob")
                .clicked()
            {
                self.link_selected_nodes();
            }

            ui.separator();

            if ui
                .add_enabled(self.undo_history.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                self.perform_undo();
            }
            if ui
                .add_enabled(self.undo_history.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.perform_redo();
            }

            ui.separator();

            ui.checkbox(&mut self.canvas.show_grid, "Grid");
            ui.checkbox(&mut self.dark_mode, "Dark mode");

            ui.separator();
            ui.label(format!("Zoom: {:.0}%", self.canvas.zoom_factor * 100.0));
        });
    }

    /// Handles keyboard shortcuts for undo and redo.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for checking input
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        // Check if any text edit widget wants keyboard focus - if so, don't handle undo/redo
        let is_editing_text = ctx.wants_keyboard_input();

        if !is_editing_text {
            // Ctrl+Z for undo
            if ctx
                .input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift)
            {
                self.perform_undo();
            }
            // Ctrl+Shift+Z or Ctrl+Y for redo
            else if ctx.input(|i| {
                (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                    || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
            }) {
                self.perform_redo();
            }
        }
    }

    /// Handles delete key presses to remove selected nodes or globs.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for checking input
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        let is_editing_text = ctx.wants_keyboard_input();

        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) && !is_editing_text {
            self.delete_selection();
        }
    }

    /// Deletes the selected globs and nodes, recording undo actions.
    ///
    /// Globs are removed first so that deleting a node and one of its globs
    /// in the same selection does not record the glob twice.
    fn delete_selection(&mut self) {
        // A resize gesture over entities that are about to disappear cannot
        // be completed meaningfully
        if let Some(mut gesture) = self.interaction.resize_gesture.take() {
            let _ = gesture.revert(&mut self.document);
        }

        let glob_ids: Vec<_> = self.interaction.selection.globs.clone();
        for glob_id in glob_ids {
            if let Some(glob) = self.document.remove_glob(&glob_id) {
                self.undo_history
                    .push_action(UndoAction::GlobDeleted { glob });
            }
        }

        let node_ids: Vec<_> = self.interaction.selection.nodes.clone();
        for node_id in node_ids {
            if let Some((node, globs)) = self.document.remove_node(&node_id) {
                self.undo_history
                    .push_action(UndoAction::NodeDeleted { node, globs });
            }
        }

        self.interaction.selection.clear();
    }

    /// Creates a new node at the center of the current view.
    fn create_node_at_view_center(&mut self, ui: &egui::Ui) {
        let center_screen = ui.ctx().screen_rect().center();
        let center_world = self.screen_to_world(center_screen);
        let node = Node::new(
            (round_coord(center_world.x), round_coord(center_world.y)),
            constants::DEFAULT_NODE_RADIUS,
        );
        let node_id = self.document.add_node(node);
        self.undo_history
            .push_action(UndoAction::NodeCreated { node_id });

        self.interaction.selection.clear();
        self.interaction.selection.nodes.push(node_id);
    }

    /// Links the two selected nodes with a new glob.
    ///
    /// The glob's anchors start on either side of the segment between the
    /// node centers, offset along the perpendicular so the fresh outline is
    /// visibly open.
    fn link_selected_nodes(&mut self) {
        let &[start, end] = self.interaction.selection.nodes.as_slice() else {
            return;
        };
        let (Some(a), Some(b)) = (
            self.document.nodes.get(&start),
            self.document.nodes.get(&end),
        ) else {
            return;
        };

        let mid = ((a.point.0 + b.point.0) / 2.0, (a.point.1 + b.point.1) / 2.0);
        let dx = b.point.0 - a.point.0;
        let dy = b.point.1 - a.point.1;
        let length = (dx * dx + dy * dy).sqrt().max(1.0);
        // Perpendicular offset scales with the node radii so small nodes get
        // a proportionally tighter glob
        let offset = (a.radius + b.radius).max(length * 0.25);
        let (px, py) = (-dy / length, dx / length);

        let options = GlobOptions {
            d: (round_coord(mid.0 + px * offset), round_coord(mid.1 + py * offset)),
            dp: (round_coord(mid.0 - px * offset), round_coord(mid.1 - py * offset)),
            a: constants::DEFAULT_BLEND,
            b: constants::DEFAULT_BLEND,
            ap: constants::DEFAULT_BLEND,
            bp: constants::DEFAULT_BLEND,
        };

        match self.document.add_glob(Glob::new(start, end, options)) {
            Ok(glob_id) => {
                self.undo_history
                    .push_action(UndoAction::GlobCreated { glob_id });
                self.interaction.selection.clear();
                self.interaction.selection.globs.push(glob_id);
            }
            Err(err) => log::warn!("could not link nodes: {err}"),
        }
    }

    /// Performs an undo operation.
    fn perform_undo(&mut self) {
        if let Some(action) = self.undo_history.pop_undo() {
            if let Some(redo_action) = self.document.apply_undo(&action) {
                self.undo_history.push_redo(redo_action);

                // Clear selection so it cannot reference removed entities
                self.interaction.selection.clear();
                self.interaction.resize_gesture = None;
                self.interaction.move_drag = None;
            }
        }
    }

    /// Performs a redo operation.
    fn perform_redo(&mut self) {
        if let Some(action) = self.undo_history.pop_redo() {
            if let Some(undo_action) = self.document.apply_redo(&action) {
                // Don't call push_action here as it would clear the redo stack
                self.undo_history.push_undo(undo_action);

                self.interaction.selection.clear();
                self.interaction.resize_gesture = None;
                self.interaction.move_drag = None;
            }
        }
    }
}

#[cfg(test)]
mod tests;
