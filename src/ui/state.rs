//! Application state management structures.
//!
//! This module contains the state structures tracking the application's
//! current UI state: canvas navigation, selection and in-flight drags, and
//! the main [`GlobApp`] struct.

use crate::gesture::ResizeGesture;
use crate::types::{Document, Glob, GlobOptions, Node, NodeId, Selection};
use crate::undo::UndoHistory;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// Storage key under which the whole app state is persisted between runs.
pub const APP_STATE_KEY: &str = "app_state";

/// State related to canvas navigation and display.
///
/// Tracks the current pan offset, zoom level, and display options for the
/// canvas.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset for navigation (in screen space)
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Whether the grid should be displayed on the canvas
    pub show_grid: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            show_grid: true,
        }
    }
}

/// An in-flight move drag of the selected nodes.
#[derive(Debug, Clone)]
pub struct MoveDrag {
    /// World position of the pointer when the drag started
    pub start_world: (f32, f32),
    /// Original node positions for delta application and undo
    pub original_positions: Vec<(NodeId, (f32, f32))>,
    /// Whether the pointer moved far enough to count as a drag (vs a click)
    pub moved: bool,
}

/// State related to user interactions with the canvas.
///
/// Tracks the selection, the active resize gesture or move drag, and canvas
/// panning.
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InteractionState {
    /// Currently selected nodes and globs
    #[serde(skip)]
    pub selection: Selection,
    /// In-flight resize gesture, if a bounds handle is being dragged
    #[serde(skip)]
    pub resize_gesture: Option<ResizeGesture>,
    /// In-flight move of the selected nodes, if any
    #[serde(skip)]
    pub move_drag: Option<MoveDrag>,
    /// Whether the current primary-button press has been routed already
    #[serde(skip)]
    pub press_handled: bool,
    /// Whether the user is currently panning the canvas
    #[serde(skip)]
    pub is_panning: bool,
    /// Last mouse position during panning operation
    #[serde(skip)]
    pub last_pan_pos: Option<egui::Pos2>,
}

/// The main application structure containing UI state and the document.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct GlobApp {
    /// The document being edited
    pub document: Document,
    /// Canvas navigation and display state
    pub canvas: CanvasState,
    /// User interaction state
    pub interaction: InteractionState,
    /// Undo/redo history for tracking and reversing actions
    pub undo_history: UndoHistory,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for GlobApp {
    fn default() -> Self {
        Self {
            document: sample_document(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            undo_history: UndoHistory::new(),
            dark_mode: true,
        }
    }
}

/// Builds the small starter scene shown on first launch: two linked nodes
/// and one free one.
fn sample_document() -> Document {
    let mut doc = Document::new();
    let left = doc.add_node(Node::new((200.0, 300.0), 40.0));
    let right = doc.add_node(Node::new((500.0, 300.0), 30.0));
    doc.add_node(Node::new((360.0, 520.0), 25.0));
    // add_glob only fails for unknown/self endpoints, which can't happen here
    let _ = doc.add_glob(Glob::new(
        left,
        right,
        GlobOptions {
            d: (350.0, 180.0),
            dp: (350.0, 420.0),
            a: 0.5,
            b: 0.5,
            ap: 0.5,
            bp: 0.5,
        },
    ));
    doc
}

impl GlobApp {
    /// Creates the app, restoring persisted state when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            if let Some(json) = storage.get_string(APP_STATE_KEY) {
                match Self::from_json(&json) {
                    Ok(app) => return app,
                    Err(err) => log::warn!("could not restore app state: {err}"),
                }
            }
        }
        Self::default()
    }

    /// Serializes the application state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    ///
    /// Cached glob shapes are rebuilt, since they are not serialized.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut app: Self = serde_json::from_str(json)?;
        app.document.recalculate_all_globs();
        Ok(app)
    }
}
