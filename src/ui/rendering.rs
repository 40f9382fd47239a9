//! Canvas rendering functionality.
//!
//! This module draws the grid, glob outlines, node circles, and the
//! selection bounding box with its resize handles. All drawing converts
//! world coordinates into screen coordinates at the last moment so the
//! document itself stays zoom-agnostic.

use super::state::GlobApp;
use crate::constants;
use crate::geometry::BoundingBox;
use crate::glob_shape::GlobShape;
use crate::types::Glob;
use eframe::egui;
use eframe::epaint::StrokeKind;

impl GlobApp {
    /// Draws the background grid on the canvas.
    ///
    /// Renders minor lines every grid cell and major lines every
    /// `GRID_WIDTH` cells. The grid is computed in world space so it stays
    /// attached to the document while panning and zooming, and is skipped
    /// entirely when the zoom level makes it too dense to read.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle defining visible area
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if !self.canvas.show_grid {
            return;
        }

        let grid_size = constants::GRID_SIZE;
        let minor_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32);
        let major_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 80);

        // Only draw grid if zoom level makes it reasonable to see
        let screen_grid_size = grid_size * self.canvas.zoom_factor;
        if screen_grid_size < 2.0 {
            return;
        }

        // Calculate world space bounds from screen space
        let top_left_world = self.screen_to_world(canvas_rect.min);
        let bottom_right_world = self.screen_to_world(canvas_rect.max);

        let start_col = (top_left_world.x / grid_size).floor() as i64;
        let end_col = (bottom_right_world.x / grid_size).ceil() as i64;
        let start_row = (top_left_world.y / grid_size).floor() as i64;
        let end_row = (bottom_right_world.y / grid_size).ceil() as i64;

        // Draw vertical grid lines
        for col in start_col..=end_col {
            let screen_x = self
                .world_to_screen(egui::pos2(col as f32 * grid_size, 0.0))
                .x;
            let color = if col % constants::GRID_WIDTH as i64 == 0 {
                major_color
            } else {
                minor_color
            };
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                egui::Stroke::new(1.0, color),
            );
        }

        // Draw horizontal grid lines
        for row in start_row..=end_row {
            let screen_y = self
                .world_to_screen(egui::pos2(0.0, row as f32 * grid_size))
                .y;
            let color = if row % constants::GRID_WIDTH as i64 == 0 {
                major_color
            } else {
                minor_color
            };
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                egui::Stroke::new(1.0, color),
            );
        }
    }

    /// Draws every glob in the document, selected ones highlighted.
    pub fn draw_globs(&self, painter: &egui::Painter) {
        for (id, glob) in &self.document.globs {
            let selected = self.interaction.selection.contains_glob(*id);
            self.draw_glob(painter, glob, selected);
        }
    }

    /// Draws one glob: its two outline curves plus, when selected, its
    /// anchor points.
    fn draw_glob(&self, painter: &egui::Painter, glob: &Glob, selected: bool) {
        let Some(shape) = &glob.shape else {
            return;
        };

        let stroke_color = if selected {
            egui::Color32::from_rgb(255, 165, 0)
        } else if self.dark_mode {
            egui::Color32::from_gray(200)
        } else {
            egui::Color32::from_gray(60)
        };
        let stroke = egui::Stroke::new(2.0, stroke_color);

        self.draw_outline_curve(painter, shape.e0, shape.f0, shape.f1, shape.e1, stroke);
        self.draw_outline_curve(painter, shape.e0p, shape.f0p, shape.f1p, shape.e1p, stroke);

        if selected {
            self.draw_glob_anchors(painter, glob, shape);
        }
    }

    /// Draws one cubic outline curve in screen space.
    fn draw_outline_curve(
        &self,
        painter: &egui::Painter,
        p0: (f32, f32),
        c0: (f32, f32),
        c1: (f32, f32),
        p1: (f32, f32),
        stroke: egui::Stroke,
    ) {
        let points = [
            self.world_to_screen(egui::pos2(p0.0, p0.1)),
            self.world_to_screen(egui::pos2(c0.0, c0.1)),
            self.world_to_screen(egui::pos2(c1.0, c1.1)),
            self.world_to_screen(egui::pos2(p1.0, p1.1)),
        ];
        painter.add(egui::epaint::CubicBezierShape::from_points_stroke(
            points,
            false,
            egui::Color32::TRANSPARENT,
            stroke,
        ));
    }

    /// Draws the anchor and blend points of a selected glob.
    fn draw_glob_anchors(&self, painter: &egui::Painter, glob: &Glob, shape: &GlobShape) {
        let anchor_color = egui::Color32::from_rgb(100, 150, 255);
        for point in [glob.options.d, glob.options.dp] {
            let screen = self.world_to_screen(egui::pos2(point.0, point.1));
            painter.circle_filled(screen, 3.5, anchor_color);
        }
        let blend_color = egui::Color32::from_rgb(160, 200, 255);
        for point in [shape.f0, shape.f1, shape.f0p, shape.f1p] {
            let screen = self.world_to_screen(egui::pos2(point.0, point.1));
            painter.circle_filled(screen, 2.5, blend_color);
        }
    }

    /// Draws every node in the document, selected ones highlighted.
    pub fn draw_nodes(&self, painter: &egui::Painter) {
        for (id, node) in &self.document.nodes {
            let selected = self.interaction.selection.contains_node(*id);
            let center = self.world_to_screen(egui::pos2(node.point.0, node.point.1));
            let radius = node.radius * self.canvas.zoom_factor;

            let fill = if self.dark_mode {
                egui::Color32::from_gray(70)
            } else {
                egui::Color32::from_gray(235)
            };
            let stroke_color = if selected {
                egui::Color32::from_rgb(255, 165, 0)
            } else if self.dark_mode {
                egui::Color32::from_gray(200)
            } else {
                egui::Color32::from_gray(60)
            };

            painter.circle(center, radius, fill, egui::Stroke::new(2.0, stroke_color));
        }
    }

    /// Draws the selection bounding box and its eight resize handles.
    ///
    /// Nothing is drawn when the selection is empty. During a resize gesture
    /// the box tracks the live working geometry, inversions included.
    pub fn draw_selection_bounds(&self, painter: &egui::Painter) {
        let Some(bounds) = self.selection_display_bounds() else {
            return;
        };
        if self.interaction.selection.is_empty() {
            return;
        }

        let box_color = egui::Color32::from_rgb(100, 150, 255);
        let min = self.world_to_screen(egui::pos2(bounds.x, bounds.y));
        let max = self.world_to_screen(egui::pos2(bounds.max_x, bounds.max_y));
        painter.rect_stroke(
            egui::Rect::from_min_max(min, max),
            0.0,
            egui::Stroke::new(1.0, box_color),
            StrokeKind::Outside,
        );

        self.draw_resize_handles(painter, &bounds);
    }

    /// Draws the four corner and four edge handles as filled squares.
    fn draw_resize_handles(&self, painter: &egui::Painter, bounds: &BoundingBox) {
        let fill = if self.dark_mode {
            egui::Color32::from_gray(230)
        } else {
            egui::Color32::WHITE
        };
        let outline = egui::Color32::from_rgb(100, 150, 255);

        for (_, world_pos) in Self::handle_positions(bounds) {
            let center = self.world_to_screen(world_pos);
            let half = constants::HANDLE_DRAW_RADIUS;
            let rect = egui::Rect::from_center_size(center, egui::vec2(half * 2.0, half * 2.0));
            painter.rect_filled(rect, 1.0, fill);
            painter.rect_stroke(rect, 1.0, egui::Stroke::new(1.0, outline), StrokeKind::Inside);
        }
    }
}
