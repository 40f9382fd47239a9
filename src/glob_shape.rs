//! Derived outline geometry for globs.
//!
//! A glob's rendered form is two cubic Bézier curves running between its
//! endpoint circles, one on each side of the anchor pair. This module derives
//! those curves from the endpoint nodes and the glob's options, and is
//! re-invoked after every mutation so cached curve data stays in sync with
//! the document.

use crate::geometry::{cubic_bezier_bounds, lerp, BoundingBox};
use crate::types::{GlobOptions, Node};

/// Which of the two tangent lines from an external point to a circle to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TangentSide {
    /// Tangent point counter-clockwise of the center-to-point direction
    Left,
    /// Tangent point clockwise of the center-to-point direction
    Right,
}

/// The derived outline curves of a glob.
///
/// The unprimed curve is the cubic `(e0, f0, f1, e1)` hung off anchor D; the
/// primed curve `(e0p, f0p, f1p, e1p)` is hung off Dp on the opposite side.
/// All points are in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobShape {
    /// Start point of the D curve, on the start node's circle
    pub e0: (f32, f32),
    /// First control point of the D curve
    pub f0: (f32, f32),
    /// Second control point of the D curve
    pub f1: (f32, f32),
    /// End point of the D curve, on the end node's circle
    pub e1: (f32, f32),
    /// Start point of the Dp curve, on the start node's circle
    pub e0p: (f32, f32),
    /// First control point of the Dp curve
    pub f0p: (f32, f32),
    /// Second control point of the Dp curve
    pub f1p: (f32, f32),
    /// End point of the Dp curve, on the end node's circle
    pub e1p: (f32, f32),
}

/// Returns the tangent point from `point` to the circle `(center, radius)`.
///
/// When the point lies on or inside the circle no tangent exists; the glob
/// degrades gracefully by taking the nearest point on the circle instead
/// (or the circle's rightmost point if center and point coincide).
fn circle_tangent_point(
    center: (f32, f32),
    radius: f32,
    point: (f32, f32),
    side: TangentSide,
) -> (f32, f32) {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance <= radius {
        if distance < f32::EPSILON {
            return (center.0 + radius, center.1);
        }
        return (
            center.0 + dx / distance * radius,
            center.1 + dy / distance * radius,
        );
    }

    let base = dy.atan2(dx);
    let spread = (radius / distance).acos();
    let angle = match side {
        TangentSide::Left => base + spread,
        TangentSide::Right => base - spread,
    };
    (
        center.0 + radius * angle.cos(),
        center.1 + radius * angle.sin(),
    )
}

impl GlobShape {
    /// Derives the outline curves for a glob from its endpoint nodes and
    /// options.
    ///
    /// # Arguments
    ///
    /// * `start` - The glob's start node
    /// * `end` - The glob's end node
    /// * `options` - The glob's anchors and blend scalars
    pub fn compute(start: &Node, end: &Node, options: &GlobOptions) -> Self {
        let e0 = circle_tangent_point(start.point, start.radius, options.d, TangentSide::Right);
        let e1 = circle_tangent_point(end.point, end.radius, options.d, TangentSide::Left);
        let e0p = circle_tangent_point(start.point, start.radius, options.dp, TangentSide::Left);
        let e1p = circle_tangent_point(end.point, end.radius, options.dp, TangentSide::Right);

        Self {
            e0,
            f0: lerp(e0, options.d, options.a),
            f1: lerp(e1, options.d, options.b),
            e1,
            e0p,
            f0p: lerp(e0p, options.dp, options.ap),
            f1p: lerp(e1p, options.dp, options.bp),
            e1p,
        }
    }

    /// Returns the bounding box of the glob's two outline curves.
    pub fn bounds(&self) -> BoundingBox {
        cubic_bezier_bounds(self.e0, self.f0, self.f1, self.e1)
            .union(&cubic_bezier_bounds(self.e0p, self.f0p, self.f1p, self.e1p))
    }
}
