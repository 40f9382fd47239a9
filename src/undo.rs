//! Undo/redo functionality for tracking and reversing user actions.
//!
//! This module provides the history collaborator the gesture engine commits
//! into: completed resizes become a single undoable transition, alongside the
//! usual create/delete/move actions of the editor.

use crate::constants::MAX_UNDO_HISTORY;
use crate::resize::Handle;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Absolute-geometry record of a set of nodes and globs at one instant.
///
/// Captured at gesture begin (the "before" state) and at commit (the "after"
/// state); applying a record writes the stored points, radii, and option
/// sets back into the document verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreRecord {
    /// Captured `(id, point, radius)` per node
    pub nodes: Vec<(NodeId, (f32, f32), f32)>,
    /// Captured `(id, options)` per glob
    pub globs: Vec<(GlobId, GlobOptions)>,
}

impl RestoreRecord {
    /// Captures the current absolute geometry of the selection.
    pub fn capture(doc: &Document, selection: &Selection) -> Self {
        Self {
            nodes: selection
                .nodes
                .iter()
                .filter_map(|id| doc.nodes.get(id))
                .map(|n| (n.id, n.point, n.radius))
                .collect(),
            globs: selection
                .globs
                .iter()
                .filter_map(|id| doc.globs.get(id))
                .map(|g| (g.id, g.options))
                .collect(),
        }
    }

    /// Writes the captured geometry back into the document and refreshes the
    /// cached shapes of every touched glob.
    pub fn apply(&self, doc: &mut Document) {
        for (id, point, radius) in &self.nodes {
            if let Some(node) = doc.nodes.get_mut(id) {
                node.point = *point;
                node.radius = *radius;
            }
        }
        for (id, options) in &self.globs {
            if let Some(glob) = doc.globs.get_mut(id) {
                glob.options = *options;
            }
        }

        let mut touched: Vec<GlobId> = self.globs.iter().map(|(id, _)| *id).collect();
        for (node_id, _, _) in &self.nodes {
            for gid in doc.globs_of_node(*node_id) {
                if !touched.contains(&gid) {
                    touched.push(gid);
                }
            }
        }
        doc.recalculate_globs(&touched);
    }
}

/// Represents different types of actions that can be undone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UndoAction {
    /// A completed resize gesture over the selection
    SelectionResized {
        /// The handle that drove the gesture
        handle: Handle,
        /// Whether node radii were preserved during the drag
        preserve_radii: bool,
        /// Geometry at gesture begin
        before: RestoreRecord,
        /// Geometry at commit
        after: RestoreRecord,
    },
    /// A node was moved from one position to another
    NodeMoved {
        /// Id of the moved node
        node_id: NodeId,
        /// Position before the drag
        old_position: (f32, f32),
        /// Position after the drag
        new_position: (f32, f32),
    },
    /// Several nodes were moved together
    NodesMoved {
        /// `(id, position)` pairs before the drag
        old_positions: Vec<(NodeId, (f32, f32))>,
        /// `(id, position)` pairs after the drag
        new_positions: Vec<(NodeId, (f32, f32))>,
    },
    /// A node was created
    NodeCreated {
        /// Id of the created node
        node_id: NodeId,
    },
    /// A node was deleted, cascading to its attached globs
    NodeDeleted {
        /// The removed node
        node: Node,
        /// The globs removed with it
        globs: Vec<Glob>,
    },
    /// A glob was created
    GlobCreated {
        /// Id of the created glob
        glob_id: GlobId,
    },
    /// A glob was deleted
    GlobDeleted {
        /// The removed glob
        glob: Glob,
    },
}

/// Manages undo/redo history for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndoHistory {
    /// Stack of actions that can be undone
    #[serde(skip)]
    undo_stack: Vec<UndoAction>,
    /// Stack of actions that can be redone
    #[serde(skip)]
    redo_stack: Vec<UndoAction>,
}

impl UndoHistory {
    /// Creates a new empty undo history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action to the undo history.
    ///
    /// This clears the redo stack since a new action invalidates any
    /// previously undone actions.
    pub fn push_action(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();

        // Limit undo history size
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Returns true if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pops the most recent action from the undo stack.
    pub fn pop_undo(&mut self) -> Option<UndoAction> {
        self.undo_stack.pop()
    }

    /// Pops the most recent action from the redo stack.
    pub fn pop_redo(&mut self) -> Option<UndoAction> {
        self.redo_stack.pop()
    }

    /// Pushes an action onto the redo stack.
    pub fn push_redo(&mut self, action: UndoAction) {
        self.redo_stack.push(action);
    }

    /// Pushes an action onto the undo stack without clearing the redo
    /// stack. Used when redoing, where the redo stack must survive.
    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
    }

    /// Clears all undo and redo history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Extension methods for applying undo/redo actions to a document.
pub trait UndoableDocument {
    /// Applies an undo action to reverse it, returning the inverse action
    /// for the redo stack.
    fn apply_undo(&mut self, action: &UndoAction) -> Option<UndoAction>;

    /// Applies a redo action to re-apply it.
    fn apply_redo(&mut self, action: &UndoAction) -> Option<UndoAction>;
}

impl UndoableDocument for Document {
    fn apply_undo(&mut self, action: &UndoAction) -> Option<UndoAction> {
        match action {
            UndoAction::SelectionResized {
                handle,
                preserve_radii,
                before,
                after,
            } => {
                before.apply(self);
                Some(UndoAction::SelectionResized {
                    handle: *handle,
                    preserve_radii: *preserve_radii,
                    before: after.clone(),
                    after: before.clone(),
                })
            }
            UndoAction::NodeMoved {
                node_id,
                old_position,
                new_position,
            } => {
                let node = self.nodes.get_mut(node_id)?;
                node.point = *old_position;
                let touched = self.globs_of_node(*node_id);
                self.recalculate_globs(&touched);
                Some(UndoAction::NodeMoved {
                    node_id: *node_id,
                    old_position: *new_position,
                    new_position: *old_position,
                })
            }
            UndoAction::NodesMoved {
                old_positions,
                new_positions,
            } => {
                for (id, position) in old_positions {
                    if let Some(node) = self.nodes.get_mut(id) {
                        node.point = *position;
                    }
                }
                let mut touched = Vec::new();
                for (id, _) in old_positions {
                    for gid in self.globs_of_node(*id) {
                        if !touched.contains(&gid) {
                            touched.push(gid);
                        }
                    }
                }
                self.recalculate_globs(&touched);
                Some(UndoAction::NodesMoved {
                    old_positions: new_positions.clone(),
                    new_positions: old_positions.clone(),
                })
            }
            UndoAction::NodeDeleted { node, globs } => {
                // Restore the deleted node, then its cascaded globs
                self.nodes.insert(node.id, node.clone());
                for glob in globs {
                    self.globs.insert(glob.id, glob.clone());
                    self.recalculate_glob(glob.id);
                }
                Some(UndoAction::NodeCreated { node_id: node.id })
            }
            UndoAction::NodeCreated { node_id } => {
                let (node, globs) = self.remove_node(node_id)?;
                Some(UndoAction::NodeDeleted { node, globs })
            }
            UndoAction::GlobDeleted { glob } => {
                self.globs.insert(glob.id, glob.clone());
                self.recalculate_glob(glob.id);
                Some(UndoAction::GlobCreated { glob_id: glob.id })
            }
            UndoAction::GlobCreated { glob_id } => {
                let glob = self.remove_glob(glob_id)?;
                Some(UndoAction::GlobDeleted { glob })
            }
        }
    }

    fn apply_redo(&mut self, action: &UndoAction) -> Option<UndoAction> {
        // Redo is just applying the reverse of an undo
        self.apply_undo(action)
    }
}
