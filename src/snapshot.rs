//! Per-gesture normalized snapshot of the selection.
//!
//! At gesture start the selection's bounding box is computed and every
//! selected entity's absolute geometry is normalized into that box's
//! coordinate space. The snapshot is read-only for the rest of the gesture;
//! the resize transform recomputes absolute geometry from it on every
//! pointer move, so no drift can accumulate across updates.

use crate::geometry::BoundingBox;
use crate::glob_shape::GlobShape;
use crate::resize::ResizeError;
use crate::types::{Document, GlobId, NodeId, Selection};

/// A point normalized into the snapshot box, with its mirrored counterpart.
///
/// `nx`/`ny` are fractions of the box extent measured from the box's min
/// corner; `nmx = 1 - nx` and `nmy = 1 - ny` are the same fractions measured
/// from the max corner, used when the working box inverts across an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSnapshot {
    /// Fraction of the box width from the left edge
    pub nx: f32,
    /// Fraction of the box height from the top edge
    pub ny: f32,
    /// Mirrored fraction from the right edge (`1 - nx`)
    pub nmx: f32,
    /// Mirrored fraction from the bottom edge (`1 - ny`)
    pub nmy: f32,
}

impl AnchorSnapshot {
    /// Normalizes an absolute point into the given box.
    ///
    /// The box must have nonzero extent on both axes; [`Snapshot::build`]
    /// guarantees that before any capture happens.
    fn capture(point: (f32, f32), bounds: &BoundingBox) -> Self {
        let nx = (point.0 - bounds.x) / bounds.width;
        let ny = (point.1 - bounds.y) / bounds.height;
        Self {
            nx,
            ny,
            nmx: 1.0 - nx,
            nmy: 1.0 - ny,
        }
    }
}

/// Snapshot record for one selected node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSnapshot {
    /// Id of the captured node
    pub id: NodeId,
    /// Absolute center at gesture start
    pub point: (f32, f32),
    /// Absolute radius at gesture start
    pub radius: f32,
    /// Normalized center
    pub center: AnchorSnapshot,
    /// Radius as a fraction of the box width
    pub nw: f32,
    /// Radius as a fraction of the box height
    pub nh: f32,
}

/// Snapshot record for one selected glob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobSnapshot {
    /// Id of the captured glob
    pub id: GlobId,
    /// Normalized D anchor
    pub d: AnchorSnapshot,
    /// Normalized Dp anchor
    pub dp: AnchorSnapshot,
    /// Blend scalar `a` at gesture start
    pub a: f32,
    /// Blend scalar `b` at gesture start
    pub b: f32,
    /// Blend scalar `ap` at gesture start
    pub ap: f32,
    /// Blend scalar `bp` at gesture start
    pub bp: f32,
}

/// Immutable per-gesture record of the selection, normalized into its
/// bounding box at gesture start.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The selection's bounding box at gesture start
    pub bounds: BoundingBox,
    /// Normalized records for every selected node
    pub nodes: Vec<NodeSnapshot>,
    /// Normalized records for every selected glob
    pub globs: Vec<GlobSnapshot>,
}

/// Computes the bounding box enclosing the selection: every selected node's
/// circle and every selected glob's outline curves.
///
/// Glob outlines are derived fresh from the current document state rather
/// than read from the cache, so the result never depends on recalculation
/// order. Ids that no longer resolve are skipped.
///
/// # Returns
///
/// The enclosing box, or `None` if the selection contributes no geometry.
pub fn selection_bounds(doc: &Document, selection: &Selection) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    let mut fold = |b: BoundingBox| {
        bounds = Some(match bounds {
            Some(acc) => acc.union(&b),
            None => b,
        });
    };

    for id in &selection.nodes {
        if let Some(node) = doc.nodes.get(id) {
            fold(BoundingBox::from_circle(node.point, node.radius));
        }
    }
    for id in &selection.globs {
        let Some(glob) = doc.globs.get(id) else {
            continue;
        };
        if let (Some(start), Some(end)) = (doc.nodes.get(&glob.start), doc.nodes.get(&glob.end)) {
            fold(GlobShape::compute(start, end, &glob.options).bounds());
        }
    }
    bounds
}

impl Snapshot {
    /// Builds the snapshot for a selection.
    ///
    /// Side-effect-free and idempotent: the document is only read.
    ///
    /// # Arguments
    ///
    /// * `doc` - The document holding the selected entities
    /// * `selection` - The ids to capture
    ///
    /// # Returns
    ///
    /// The snapshot, or a [`ResizeError`] if the selection is empty or its
    /// bounding box has zero width or height (normalization would divide
    /// by zero).
    pub fn build(doc: &Document, selection: &Selection) -> Result<Self, ResizeError> {
        let bounds = selection_bounds(doc, selection).ok_or(ResizeError::EmptySelection)?;
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Err(ResizeError::DegenerateSelection {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let nodes = selection
            .nodes
            .iter()
            .filter_map(|id| doc.nodes.get(id))
            .map(|node| NodeSnapshot {
                id: node.id,
                point: node.point,
                radius: node.radius,
                center: AnchorSnapshot::capture(node.point, &bounds),
                nw: node.radius / bounds.width,
                nh: node.radius / bounds.height,
            })
            .collect();

        let globs = selection
            .globs
            .iter()
            .filter_map(|id| doc.globs.get(id))
            .map(|glob| GlobSnapshot {
                id: glob.id,
                d: AnchorSnapshot::capture(glob.options.d, &bounds),
                dp: AnchorSnapshot::capture(glob.options.dp, &bounds),
                a: glob.options.a,
                b: glob.options.b,
                ap: glob.options.ap,
                bp: glob.options.bp,
            })
            .collect();

        Ok(Self {
            bounds,
            nodes,
            globs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Glob, GlobOptions, Node};

    fn single_node_doc() -> (Document, Selection, NodeId) {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new((10.0, 10.0), 2.0));
        let selection = Selection {
            nodes: vec![id],
            globs: vec![],
        };
        (doc, selection, id)
    }

    #[test]
    fn test_single_node_bounds_is_circle_box() {
        let (doc, selection, _) = single_node_doc();
        let bounds = selection_bounds(&doc, &selection).unwrap();
        assert_eq!(bounds, BoundingBox::from_min_max(8.0, 8.0, 12.0, 12.0));
    }

    #[test]
    fn test_empty_selection_is_refused() {
        let doc = Document::new();
        let selection = Selection::default();
        assert!(matches!(
            Snapshot::build(&doc, &selection),
            Err(ResizeError::EmptySelection)
        ));
    }

    #[test]
    fn test_degenerate_selection_is_refused() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new((10.0, 10.0), 0.0));
        let selection = Selection {
            nodes: vec![id],
            globs: vec![],
        };
        assert!(matches!(
            Snapshot::build(&doc, &selection),
            Err(ResizeError::DegenerateSelection { .. })
        ));
    }

    #[test]
    fn test_normalized_node_coordinates() {
        let mut doc = Document::new();
        let a = doc.add_node(Node::new((10.0, 10.0), 2.0));
        let b = doc.add_node(Node::new((2.0, 2.0), 2.0));
        let c = doc.add_node(Node::new((18.0, 18.0), 2.0));
        let selection = Selection {
            nodes: vec![a, b, c],
            globs: vec![],
        };

        let snapshot = Snapshot::build(&doc, &selection).unwrap();

        // bounds are (0,0)..(20,20); the first node sits at the center
        assert_eq!(snapshot.bounds, BoundingBox::from_min_max(0.0, 0.0, 20.0, 20.0));
        let first = &snapshot.nodes[0];
        assert_eq!(first.id, a);
        assert_eq!(first.center.nx, 0.5);
        assert_eq!(first.center.ny, 0.5);
        assert_eq!(first.center.nmx, 0.5);
        assert_eq!(first.center.nmy, 0.5);
        assert_eq!(first.nw, 0.1);
        assert_eq!(first.nh, 0.1);

        let corner = &snapshot.nodes[1];
        assert_eq!(corner.center.nx, 0.1);
        assert_eq!(corner.center.nmx, 0.9);
    }

    #[test]
    fn test_glob_capture_preserves_scalars() {
        let mut doc = Document::new();
        let n0 = doc.add_node(Node::new((0.0, 50.0), 10.0));
        let n1 = doc.add_node(Node::new((100.0, 50.0), 10.0));
        let glob_id = doc
            .add_glob(Glob::new(
                n0,
                n1,
                GlobOptions {
                    d: (50.0, 0.0),
                    dp: (50.0, 100.0),
                    a: 0.3,
                    b: 0.4,
                    ap: 0.5,
                    bp: 0.6,
                },
            ))
            .unwrap();
        let selection = Selection {
            nodes: vec![n0, n1],
            globs: vec![glob_id],
        };

        let snapshot = Snapshot::build(&doc, &selection).unwrap();

        let glob = &snapshot.globs[0];
        assert_eq!(glob.id, glob_id);
        assert_eq!((glob.a, glob.b, glob.ap, glob.bp), (0.3, 0.4, 0.5, 0.6));
        // D and Dp normalize against the shared selection box
        assert!((glob.d.nx - glob.dp.nx).abs() < 1e-6);
        assert!(glob.d.ny < glob.dp.ny);
    }

    #[test]
    fn test_build_does_not_mutate_document() {
        let (mut doc, selection, id) = single_node_doc();
        doc.nodes.get_mut(&id).unwrap().radius = 2.0;
        let before = doc.to_json().unwrap();

        let first = Snapshot::build(&doc, &selection).unwrap();
        let second = Snapshot::build(&doc, &selection).unwrap();

        assert_eq!(first, second);
        assert_eq!(doc.to_json().unwrap(), before);
    }
}
