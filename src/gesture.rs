//! Gesture lifecycle for interactive resizes.
//!
//! A gesture owns the snapshot and the live working box for one drag:
//! `begin` validates the selection and captures state, `update` runs the
//! resize transform once per pointer move, and the gesture ends in exactly
//! one of `complete` (an undoable transition is recorded) or `revert` (the
//! begin-time geometry is restored). Nothing is valid outside the Active
//! state without a new `begin`.

use crate::resize::{resize, Handle, ResizeError, WorkingBox};
use crate::snapshot::Snapshot;
use crate::types::{Document, Selection};
use crate::undo::{RestoreRecord, UndoAction, UndoHistory};

/// The lifecycle state of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// Gesture is live and accepting pointer updates
    Active,
    /// Gesture ended by recording an undoable transition
    Committed,
    /// Gesture ended by restoring the begin-time geometry
    Reverted,
}

/// One in-flight resize gesture.
///
/// Holds exclusive write access to the selected entities for its duration;
/// the document store is responsible for any concurrency control above this.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    state: GestureState,
    handle: Handle,
    selection: Selection,
    snapshot: Snapshot,
    working: WorkingBox,
    restore: RestoreRecord,
    /// Modifier state of the most recent update, recorded into the commit
    preserve_radii: bool,
}

impl ResizeGesture {
    /// Begins a resize gesture on the current selection.
    ///
    /// Captures the normalized snapshot and an absolute-geometry restore
    /// record, and initializes the working box from the snapshot bounds.
    /// Empty or zero-area selections refuse to begin.
    ///
    /// # Arguments
    ///
    /// * `doc` - The document holding the selection (read-only here)
    /// * `selection` - The entities the gesture will own
    /// * `handle` - The handle being dragged
    ///
    /// # Returns
    ///
    /// An Active gesture, or the [`ResizeError`] that prevented activation.
    pub fn begin(
        doc: &Document,
        selection: &Selection,
        handle: Handle,
    ) -> Result<Self, ResizeError> {
        let snapshot = match Snapshot::build(doc, selection) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("refusing resize gesture: {err}");
                return Err(err);
            }
        };
        let working = WorkingBox::from_bounds(&snapshot.bounds);
        let restore = RestoreRecord::capture(doc, selection);
        log::debug!(
            "resize gesture begun: {:?} handle {} over {} nodes / {} globs",
            handle.kind(),
            handle.index(),
            snapshot.nodes.len(),
            snapshot.globs.len()
        );

        Ok(Self {
            state: GestureState::Active,
            handle,
            selection: selection.clone(),
            snapshot,
            working,
            restore,
            preserve_radii: false,
        })
    }

    /// The gesture's current lifecycle state.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// True while the gesture accepts updates.
    pub fn is_active(&self) -> bool {
        self.state == GestureState::Active
    }

    /// The handle this gesture was begun with.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The live working box (for drawing the selection bounds mid-drag).
    pub fn working(&self) -> &WorkingBox {
        &self.working
    }

    /// Applies one pointer move.
    ///
    /// Runs the resize transform against the snapshot and working box, then
    /// refreshes the cached outline curves of every glob touched by the
    /// selection. A non-finite pointer aborts the gesture to Reverted.
    ///
    /// # Arguments
    ///
    /// * `doc` - The document to mutate in place
    /// * `pointer` - Pointer position in world space
    /// * `preserve_radii` - Modifier flag: keep original node radii
    pub fn update(
        &mut self,
        doc: &mut Document,
        pointer: (f32, f32),
        preserve_radii: bool,
    ) -> Result<(), ResizeError> {
        if !self.is_active() {
            return Err(ResizeError::NotActive);
        }
        if !pointer.0.is_finite() || !pointer.1.is_finite() {
            log::warn!("aborting resize gesture: non-finite pointer {pointer:?}");
            self.restore.apply(doc);
            self.state = GestureState::Reverted;
            return Err(ResizeError::NonFinitePointer);
        }

        self.preserve_radii = preserve_radii;
        resize(
            doc,
            self.handle,
            pointer,
            preserve_radii,
            &mut self.working,
            &self.snapshot,
        );
        doc.recalculate_globs_for_selection(&self.selection);
        Ok(())
    }

    /// Ends the gesture by restoring the begin-time geometry.
    pub fn revert(&mut self, doc: &mut Document) -> Result<(), ResizeError> {
        if !self.is_active() {
            return Err(ResizeError::NotActive);
        }
        self.restore.apply(doc);
        self.state = GestureState::Reverted;
        log::debug!("resize gesture reverted");
        Ok(())
    }

    /// Ends the gesture by recording a single undoable transition from the
    /// begin-time geometry to the current geometry.
    pub fn complete(
        &mut self,
        doc: &mut Document,
        history: &mut UndoHistory,
    ) -> Result<(), ResizeError> {
        if !self.is_active() {
            return Err(ResizeError::NotActive);
        }
        let after = RestoreRecord::capture(doc, &self.selection);
        if after != self.restore {
            history.push_action(UndoAction::SelectionResized {
                handle: self.handle,
                preserve_radii: self.preserve_radii,
                before: self.restore.clone(),
                after,
            });
        }
        self.state = GestureState::Committed;
        log::debug!("resize gesture committed");
        Ok(())
    }
}
