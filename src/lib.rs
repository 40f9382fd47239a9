//! # Glob Editor
//!
//! A 2D curve-network editor: circular nodes connected by parametric "glob"
//! connectors, selected and rescaled by dragging the handles of the
//! selection's bounding box. Resizes stay consistent through any drag,
//! including mirrored anchor relationships when a handle is dragged past the
//! opposite side of the box.
//!
//! ## Features
//! - Tight bounding boxes for the cubic Bézier outline curves of globs
//! - Snapshot-based resize gestures: normalized at begin, recomputed from
//!   scratch on every pointer move, committed or reverted on release
//! - Sign-flip/mirroring algebra for glob anchors across box inversions
//! - Undo/redo of whole gestures as single transitions
//! - Canvas panning, zooming, and selection

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod geometry;
pub mod gesture;
pub mod glob_shape;
pub mod resize;
pub mod snapshot;
pub mod types;
pub mod undo;
mod ui;

pub use gesture::{GestureState, ResizeGesture};
pub use resize::{Handle, HandleKind, ResizeError, WorkingBox};
pub use snapshot::Snapshot;
pub use types::*;
use ui::GlobApp;

/// Runs the glob editor application with default settings.
///
/// This function initializes the egui application window and starts the main
/// event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use glob_editor::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Glob Editor",
        options,
        Box::new(|cc| Ok(Box::new(GlobApp::new(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_default_is_empty() {
        let doc = Document::default();
        assert!(doc.nodes.is_empty());
        assert!(doc.globs.is_empty());
    }

    #[test]
    fn test_handle_reexport() {
        let handle = Handle::new(HandleKind::Edge, 0).unwrap();
        assert_eq!(handle.index(), 0);
    }
}
