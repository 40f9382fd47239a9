//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, hit-testing, and the routing
//! of pointer events into selection changes, move drags, and resize
//! gestures. It also owns the coordinate transformations between screen and
//! world space (the camera boundary of the resize engine: gestures receive
//! already-converted world-space pointer positions).

use super::state::{GlobApp, MoveDrag};
use crate::constants;
use crate::geometry::{cubic_bezier_point, round_coord, BoundingBox};
use crate::gesture::ResizeGesture;
use crate::resize::Handle;
use crate::snapshot::selection_bounds;
use crate::types::{GlobId, NodeId};
use crate::undo::UndoAction;
use eframe::egui;

/// Number of samples per outline curve used for glob hit-testing.
const GLOB_HIT_SAMPLES: u32 = 48;

impl GlobApp {
    /// Converts screen coordinates to world coordinates accounting for zoom
    /// and pan.
    ///
    /// # Arguments
    ///
    /// * `screen_pos` - Position in screen space (pixels)
    ///
    /// # Returns
    ///
    /// The corresponding position in world space
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom
    /// and pan.
    ///
    /// # Arguments
    ///
    /// * `world_pos` - Position in world space
    ///
    /// # Returns
    ///
    /// The corresponding position in screen space (pixels)
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    ///
    /// Uses Cmd on macOS and Ctrl on other platforms for modifier-based
    /// panning.
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // modifiers.command automatically uses Cmd on macOS and Ctrl elsewhere
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    let delta = current_pos - last_pos;
                    self.canvas.offset += delta;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming.
    ///
    /// Zooms in/out while keeping the mouse cursor position fixed in world
    /// space. Zoom range is clamped between the configured limits. Only
    /// zooms if the cursor is over the canvas.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);

        if scroll_delta != 0.0 {
            let mouse_pos = ui
                .input(|i| i.pointer.hover_pos())
                .or_else(|| response.interact_pointer_pos());

            if let Some(mouse_pos) = mouse_pos {
                if !response.rect.contains(mouse_pos) {
                    return;
                }

                // Calculate the world position under the mouse cursor before zoom
                let world_pos_before_zoom = self.screen_to_world(mouse_pos);

                let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
                let old_zoom = self.canvas.zoom_factor;
                self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta)
                    .clamp(constants::MIN_ZOOM, constants::MAX_ZOOM);

                // Only adjust offset if zoom actually changed
                if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
                    // Keep the world position under the cursor fixed on screen
                    let world_pos_after_zoom = self.world_to_screen(world_pos_before_zoom);
                    self.canvas.offset += mouse_pos - world_pos_after_zoom;
                }
            }
        }
    }

    /// The world-space bounding box the selection handles attach to.
    ///
    /// During a resize gesture this is the live working box (so the drawn
    /// cage follows the drag, inversions included); otherwise it is derived
    /// from the current selection.
    pub fn selection_display_bounds(&self) -> Option<BoundingBox> {
        if let Some(gesture) = &self.interaction.resize_gesture {
            let working = gesture.working();
            return Some(BoundingBox::from_min_max(
                working.mx,
                working.my,
                working.mx + working.mw,
                working.my + working.mh,
            ));
        }
        selection_bounds(&self.document, &self.interaction.selection)
    }

    /// Returns the eight bounds handles and their world-space positions:
    /// corners clockwise from top-left, then edge midpoints clockwise from
    /// the top.
    pub fn handle_positions(bounds: &BoundingBox) -> [(Handle, egui::Pos2); 8] {
        let center_x = bounds.x + bounds.width / 2.0;
        let center_y = bounds.y + bounds.height / 2.0;
        let [tl, tr, br, bl, top, right, bottom, left] = Handle::all();
        [
            (tl, egui::pos2(bounds.x, bounds.y)),
            (tr, egui::pos2(bounds.max_x, bounds.y)),
            (br, egui::pos2(bounds.max_x, bounds.max_y)),
            (bl, egui::pos2(bounds.x, bounds.max_y)),
            (top, egui::pos2(center_x, bounds.y)),
            (right, egui::pos2(bounds.max_x, center_y)),
            (bottom, egui::pos2(center_x, bounds.max_y)),
            (left, egui::pos2(bounds.x, center_y)),
        ]
    }

    /// Finds the bounds handle under the given screen position, if any.
    ///
    /// Hit areas are sized in screen pixels so handles stay grabbable at any
    /// zoom. Corners win over edges (they are checked first).
    pub fn find_handle_at(&self, screen_pos: egui::Pos2) -> Option<Handle> {
        let bounds = self.selection_display_bounds()?;
        for (handle, world_pos) in Self::handle_positions(&bounds) {
            let handle_screen = self.world_to_screen(world_pos);
            if handle_screen.distance(screen_pos) <= constants::HANDLE_HIT_RADIUS {
                return Some(handle);
            }
        }
        None
    }

    /// Finds the node at the given world position, if any.
    pub fn find_node_at_position(&self, pos: egui::Pos2) -> Option<NodeId> {
        for (id, node) in &self.document.nodes {
            let center = egui::pos2(node.point.0, node.point.1);
            if center.distance(pos) <= node.radius {
                return Some(*id);
            }
        }
        None
    }

    /// Finds the glob whose outline passes near the given world position.
    ///
    /// Samples both cached outline curves and compares against the click
    /// threshold.
    pub fn find_glob_at_position(&self, pos: egui::Pos2) -> Option<GlobId> {
        for (id, glob) in &self.document.globs {
            let Some(shape) = &glob.shape else {
                continue;
            };
            let curves = [
                (shape.e0, shape.f0, shape.f1, shape.e1),
                (shape.e0p, shape.f0p, shape.f1p, shape.e1p),
            ];
            for (p0, c0, c1, p1) in curves {
                for i in 0..=GLOB_HIT_SAMPLES {
                    let t = i as f32 / GLOB_HIT_SAMPLES as f32;
                    let (x, y) = cubic_bezier_point(p0, c0, c1, p1, t);
                    if egui::pos2(x, y).distance(pos) <= constants::CLICK_THRESHOLD {
                        return Some(*id);
                    }
                }
            }
        }
        None
    }

    /// Routes primary-button pointer events into selection changes, move
    /// drags, and resize gestures.
    ///
    /// Press on a bounds handle begins a resize gesture; press on an entity
    /// updates the selection (Shift toggles membership) and may start a move
    /// drag; press on empty canvas clears the selection. While dragging, the
    /// Shift modifier is forwarded to the gesture as the preserve-radii
    /// flag. Release completes the gesture; Escape reverts it.
    pub fn handle_canvas_interaction(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        if self.interaction.is_panning {
            return;
        }

        // Escape reverts an in-flight gesture before anything else
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            if let Some(mut gesture) = self.interaction.resize_gesture.take() {
                let _ = gesture.revert(&mut self.document);
            }
        }

        let shift_held = ui.input(|i| i.modifiers.shift);

        if ui.input(|i| i.pointer.primary_down()) {
            if let Some(pos) = response.interact_pointer_pos() {
                if !self.interaction.press_handled {
                    self.interaction.press_handled = true;
                    self.begin_interaction(pos, shift_held);
                } else {
                    let world = self.screen_to_world(pos);
                    self.continue_interaction((world.x, world.y), shift_held);
                }
            }
        } else {
            if self.interaction.press_handled {
                self.finish_interaction();
            }
            self.interaction.press_handled = false;
        }
    }

    /// Starts whichever interaction the pressed position implies.
    fn begin_interaction(&mut self, screen_pos: egui::Pos2, shift_held: bool) {
        if let Some(handle) = self.find_handle_at(screen_pos) {
            match ResizeGesture::begin(&self.document, &self.interaction.selection, handle) {
                Ok(gesture) => self.interaction.resize_gesture = Some(gesture),
                // refusal (empty/degenerate selection) is a no-op
                Err(_) => {}
            }
            return;
        }

        let world = self.screen_to_world(screen_pos);
        if let Some(node_id) = self.find_node_at_position(world) {
            if shift_held {
                self.interaction.selection.toggle_node(node_id);
            } else if !self.interaction.selection.contains_node(node_id) {
                self.interaction.selection.clear();
                self.interaction.selection.nodes.push(node_id);
            }
            self.start_move_drag((world.x, world.y));
        } else if let Some(glob_id) = self.find_glob_at_position(world) {
            if shift_held {
                self.interaction.selection.toggle_glob(glob_id);
            } else if !self.interaction.selection.contains_glob(glob_id) {
                self.interaction.selection.clear();
                self.interaction.selection.globs.push(glob_id);
            }
        } else if !shift_held {
            self.interaction.selection.clear();
        }
    }

    /// Begins a move drag of the currently selected nodes, if any.
    fn start_move_drag(&mut self, start_world: (f32, f32)) {
        let original_positions: Vec<(NodeId, (f32, f32))> = self
            .interaction
            .selection
            .nodes
            .iter()
            .filter_map(|id| self.document.nodes.get(id).map(|n| (*id, n.point)))
            .collect();
        if !original_positions.is_empty() {
            self.interaction.move_drag = Some(MoveDrag {
                start_world,
                original_positions,
                moved: false,
            });
        }
    }

    /// Feeds the live pointer position into the active drag, if any.
    fn continue_interaction(&mut self, world: (f32, f32), shift_held: bool) {
        if let Some(mut gesture) = self.interaction.resize_gesture.take() {
            // a failed update has already aborted the gesture; drop it
            if gesture.update(&mut self.document, world, shift_held).is_ok() {
                self.interaction.resize_gesture = Some(gesture);
            }
            return;
        }

        let Some(drag) = &mut self.interaction.move_drag else {
            return;
        };
        let delta = (world.0 - drag.start_world.0, world.1 - drag.start_world.1);
        if !drag.moved {
            let distance = (delta.0 * delta.0 + delta.1 * delta.1).sqrt();
            if distance < constants::CLICK_THRESHOLD / self.canvas.zoom_factor.max(0.01) {
                return;
            }
            drag.moved = true;
        }
        let moves: Vec<(NodeId, (f32, f32))> = drag
            .original_positions
            .iter()
            .map(|(id, original)| {
                (
                    *id,
                    (
                        round_coord(original.0 + delta.0),
                        round_coord(original.1 + delta.1),
                    ),
                )
            })
            .collect();
        for (id, point) in &moves {
            if let Some(node) = self.document.nodes.get_mut(id) {
                node.point = *point;
            }
        }
        self.document
            .recalculate_globs_for_selection(&self.interaction.selection);
    }

    /// Ends the active drag on pointer release.
    fn finish_interaction(&mut self) {
        if let Some(mut gesture) = self.interaction.resize_gesture.take() {
            let _ = gesture.complete(&mut self.document, &mut self.undo_history);
        }

        if let Some(drag) = self.interaction.move_drag.take() {
            if drag.moved {
                let new_positions: Vec<(NodeId, (f32, f32))> = drag
                    .original_positions
                    .iter()
                    .filter_map(|(id, _)| self.document.nodes.get(id).map(|n| (*id, n.point)))
                    .collect();
                if new_positions != drag.original_positions {
                    // a lone node records the simpler single-move action
                    let single = match (drag.original_positions.as_slice(), new_positions.as_slice())
                    {
                        (&[(node_id, old_position)], &[(_, new_position)]) => {
                            Some((node_id, old_position, new_position))
                        }
                        _ => None,
                    };
                    let action = match single {
                        Some((node_id, old_position, new_position)) => UndoAction::NodeMoved {
                            node_id,
                            old_position,
                            new_position,
                        },
                        None => UndoAction::NodesMoved {
                            old_positions: drag.original_positions,
                            new_positions,
                        },
                    };
                    self.undo_history.push_action(action);
                }
            }
        }
    }
}
