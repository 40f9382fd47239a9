//! Shared application-wide constants.
//! Centralizes tweakable values used across the resize engine and the canvas UI.

// Document precision
/// Number of decimal places that absolute coordinates and radii are rounded to
/// when written back into the document.
pub const COORD_DECIMALS: u32 = 2;

// Node defaults
/// Default radius (in world units) for newly created nodes.
pub const DEFAULT_NODE_RADIUS: f32 = 25.0;
/// Smallest radius a node may be created with.
pub const MIN_NODE_RADIUS: f32 = 1.0;

// Glob defaults
/// Default blend scalar applied to both ends of a freshly linked glob.
pub const DEFAULT_BLEND: f32 = 0.5;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;
/// Number of grid cells between thicker grid lines.
pub const GRID_WIDTH: usize = 5;

// Canvas interactions
/// Click threshold in world units used for distinguishing click vs drag.
pub const CLICK_THRESHOLD: f32 = 10.0;
/// Half-size of a bounds handle's hit area, in screen pixels (zoom independent).
pub const HANDLE_HIT_RADIUS: f32 = 8.0;
/// Half-size of a drawn bounds handle square, in screen pixels.
pub const HANDLE_DRAW_RADIUS: f32 = 4.5;
/// Minimum zoom factor for the canvas.
pub const MIN_ZOOM: f32 = 0.25;
/// Maximum zoom factor for the canvas.
pub const MAX_ZOOM: f32 = 5.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;
