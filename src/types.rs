//! Core data types and structures for the glob editor.
//!
//! This module defines the fundamental data structures used throughout the
//! application: circular nodes, the curved "glob" connectors between them,
//! the selection, and the main document structure with its mutation API.

use crate::glob_shape::GlobShape;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = Uuid;

/// Unique identifier for globs.
pub type GlobId = Uuid;

/// Errors reported by the document mutation API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A referenced node id is not present in the document.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// A referenced glob id is not present in the document.
    #[error("glob {0} does not exist")]
    UnknownGlob(GlobId),
    /// A glob may not connect a node to itself.
    #[error("glob endpoints must be two distinct nodes")]
    SelfGlob,
}

/// A circular node: a center point and a radius, both in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Center position on the canvas as (x, y) coordinates
    pub point: (f32, f32),
    /// Circle radius in world units
    pub radius: f32,
}

impl Node {
    /// Creates a new node with the given center and radius.
    ///
    /// # Arguments
    ///
    /// * `point` - The (x, y) center position on the canvas
    /// * `radius` - The circle radius in world units
    ///
    /// # Returns
    ///
    /// A new `Node` with a unique ID.
    pub fn new(point: (f32, f32), radius: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            point,
            radius,
        }
    }
}

/// The editable parameters of a glob connector.
///
/// `d` and `dp` are the two control anchors; `a`, `b`, `ap`, `bp` are
/// dimensionless blend scalars in [0, 1] describing how strongly each outline
/// curve leans toward its endpoint nodes. The unprimed values shape the curve
/// derived from `d`, the primed values the curve derived from `dp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobOptions {
    /// First control anchor position
    pub d: (f32, f32),
    /// Second control anchor position
    pub dp: (f32, f32),
    /// Blend scalar toward the start node for the `d` curve
    pub a: f32,
    /// Blend scalar toward the end node for the `d` curve
    pub b: f32,
    /// Blend scalar toward the start node for the `dp` curve
    pub ap: f32,
    /// Blend scalar toward the end node for the `dp` curve
    pub bp: f32,
}

/// A curved connector between two nodes.
///
/// The glob's rendered geometry is derived from its endpoint nodes and its
/// [`GlobOptions`]; the derived outline is cached in `shape` and refreshed by
/// [`Document::recalculate_glob`] after any mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Glob {
    /// Unique identifier for this glob
    pub id: GlobId,
    /// ID of the start node
    pub start: NodeId,
    /// ID of the end node
    pub end: NodeId,
    /// Anchor points and blend scalars shaping the connector
    pub options: GlobOptions,
    /// Cached outline curves, derived from the endpoint nodes and `options`
    #[serde(skip)]
    pub shape: Option<GlobShape>,
}

impl Glob {
    /// Creates a new glob between two nodes.
    ///
    /// # Arguments
    ///
    /// * `start` - The ID of the start node
    /// * `end` - The ID of the end node
    /// * `options` - Anchor points and blend scalars for the connector
    ///
    /// # Returns
    ///
    /// A new glob with a unique ID and no cached shape.
    pub fn new(start: NodeId, end: NodeId, options: GlobOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            options,
            shape: None,
        }
    }
}

/// The set of currently selected entities, by id.
///
/// Owned by the UI interaction state and passed by reference into the resize
/// engine, which only ever mutates the entities the selection names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected node ids, in selection order
    pub nodes: Vec<NodeId>,
    /// Selected glob ids, in selection order
    pub globs: Vec<GlobId>,
}

impl Selection {
    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.globs.is_empty()
    }

    /// Removes everything from the selection.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.globs.clear();
    }

    /// Returns true if the given node is part of the selection.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Returns true if the given glob is part of the selection.
    pub fn contains_glob(&self, id: GlobId) -> bool {
        self.globs.contains(&id)
    }

    /// Adds the node if absent, removes it if present (shift-click semantics).
    pub fn toggle_node(&mut self, id: NodeId) {
        if let Some(pos) = self.nodes.iter().position(|n| *n == id) {
            self.nodes.remove(pos);
        } else {
            self.nodes.push(id);
        }
    }

    /// Adds the glob if absent, removes it if present (shift-click semantics).
    pub fn toggle_glob(&mut self, id: GlobId) {
        if let Some(pos) = self.globs.iter().position(|g| *g == id) {
            self.globs.remove(pos);
        } else {
            self.globs.push(id);
        }
    }
}

/// The main document structure containing all nodes and globs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Map of all nodes, indexed by their ID
    pub nodes: HashMap<NodeId, Node>,
    /// Map of all globs, indexed by their ID
    pub globs: HashMap<GlobId, Glob>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the document to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string.
    ///
    /// Cached glob shapes are not part of the serialized form; they are
    /// recomputed after loading.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.recalculate_all_globs();
        Ok(doc)
    }

    /// Adds a node to the document.
    ///
    /// # Arguments
    ///
    /// * `node` - The node to add
    ///
    /// # Returns
    ///
    /// The ID of the newly added node.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Adds a glob between two existing, distinct nodes.
    ///
    /// The glob's cached shape is computed immediately.
    ///
    /// # Arguments
    ///
    /// * `glob` - The glob to add; its `start` and `end` must exist
    ///
    /// # Returns
    ///
    /// The ID of the newly added glob, or a [`DocumentError`] naming the
    /// violated precondition.
    pub fn add_glob(&mut self, glob: Glob) -> Result<GlobId, DocumentError> {
        if glob.start == glob.end {
            return Err(DocumentError::SelfGlob);
        }
        if !self.nodes.contains_key(&glob.start) {
            return Err(DocumentError::UnknownNode(glob.start));
        }
        if !self.nodes.contains_key(&glob.end) {
            return Err(DocumentError::UnknownNode(glob.end));
        }

        let id = glob.id;
        self.globs.insert(id, glob);
        self.recalculate_glob(id);
        Ok(id)
    }

    /// Removes a node and all globs attached to it.
    ///
    /// # Arguments
    ///
    /// * `node_id` - The ID of the node to remove
    ///
    /// # Returns
    ///
    /// The removed node and its cascaded globs, or `None` if the node
    /// didn't exist.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<(Node, Vec<Glob>)> {
        let node = self.nodes.remove(node_id)?;
        let attached: Vec<GlobId> = self
            .globs
            .values()
            .filter(|g| g.start == *node_id || g.end == *node_id)
            .map(|g| g.id)
            .collect();
        let globs = attached
            .iter()
            .filter_map(|id| self.globs.remove(id))
            .collect();
        Some((node, globs))
    }

    /// Removes a glob from the document.
    ///
    /// # Returns
    ///
    /// The removed glob, or `None` if it didn't exist.
    pub fn remove_glob(&mut self, glob_id: &GlobId) -> Option<Glob> {
        self.globs.remove(glob_id)
    }

    /// Returns the ids of all globs attached to the given node.
    pub fn globs_of_node(&self, node_id: NodeId) -> Vec<GlobId> {
        self.globs
            .values()
            .filter(|g| g.start == node_id || g.end == node_id)
            .map(|g| g.id)
            .collect()
    }

    /// Recomputes the cached outline curves of one glob from its endpoint
    /// nodes and options.
    ///
    /// Globs whose endpoints are missing keep their previous cached shape;
    /// that only happens transiently while a cascade delete is in flight.
    pub fn recalculate_glob(&mut self, glob_id: GlobId) {
        let Some(glob) = self.globs.get(&glob_id) else {
            return;
        };
        let (Some(start), Some(end)) = (self.nodes.get(&glob.start), self.nodes.get(&glob.end))
        else {
            return;
        };
        let shape = GlobShape::compute(start, end, &glob.options);
        if let Some(glob) = self.globs.get_mut(&glob_id) {
            glob.shape = Some(shape);
        }
    }

    /// Recomputes the cached shapes of the given globs.
    pub fn recalculate_globs(&mut self, glob_ids: &[GlobId]) {
        for id in glob_ids {
            self.recalculate_glob(*id);
        }
    }

    /// Recomputes the cached shapes of every glob in the document.
    pub fn recalculate_all_globs(&mut self) {
        let ids: Vec<GlobId> = self.globs.keys().copied().collect();
        self.recalculate_globs(&ids);
    }

    /// Recomputes the cached shapes of all globs touched by the selection:
    /// the selected globs themselves plus any glob attached to a selected node.
    pub fn recalculate_globs_for_selection(&mut self, selection: &Selection) {
        let mut ids = selection.globs.clone();
        for node_id in &selection.nodes {
            for gid in self.globs_of_node(*node_id) {
                if !ids.contains(&gid) {
                    ids.push(gid);
                }
            }
        }
        self.recalculate_globs(&ids);
    }
}
