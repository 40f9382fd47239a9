//! Geometric primitives shared by the resize engine.
//!
//! This module provides the axis-aligned [`BoundingBox`], coordinate rounding
//! at the document's precision, and the tight bounding-box solver for cubic
//! Bézier segments that selection bounds are built from.

use serde::{Deserialize, Serialize};

/// Threshold below which the leading coefficient of the derivative quadratic
/// is treated as zero (degenerate/linear derivative).
const DERIVATIVE_EPSILON: f32 = 1e-6;

/// Rounds a world coordinate to the document's precision
/// ([`crate::constants::COORD_DECIMALS`] decimal places).
pub fn round_coord(value: f32) -> f32 {
    let factor = 10f32.powi(crate::constants::COORD_DECIMALS as i32);
    (value * factor).round() / factor
}

/// Linearly interpolates between two points.
pub fn lerp(from: (f32, f32), to: (f32, f32), t: f32) -> (f32, f32) {
    (
        from.0 + (to.0 - from.0) * t,
        from.1 + (to.1 - from.1) * t,
    )
}

/// An axis-aligned bounding box with cached extent.
///
/// `width`/`height` always equal `max_x - x` / `max_y - y`. Boxes are derived
/// values; they are never persisted independently of the geometry they
/// describe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum x coordinate
    pub x: f32,
    /// Minimum y coordinate
    pub y: f32,
    /// Maximum x coordinate
    pub max_x: f32,
    /// Maximum y coordinate
    pub max_y: f32,
    /// Horizontal extent (`max_x - x`)
    pub width: f32,
    /// Vertical extent (`max_y - y`)
    pub height: f32,
}

impl BoundingBox {
    /// Creates a box from min/max corner coordinates.
    pub fn from_min_max(x: f32, y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x,
            y,
            max_x,
            max_y,
            width: max_x - x,
            height: max_y - y,
        }
    }

    /// Creates the box enclosing a circle.
    ///
    /// # Arguments
    ///
    /// * `center` - The circle's center point
    /// * `radius` - The circle's radius
    pub fn from_circle(center: (f32, f32), radius: f32) -> Self {
        Self::from_min_max(
            center.0 - radius,
            center.1 - radius,
            center.0 + radius,
            center.1 + radius,
        )
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::from_min_max(
            self.x.min(other.x),
            self.y.min(other.y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Returns true if the point lies inside the box (inclusive, with a
    /// small tolerance for float rounding).
    pub fn contains(&self, point: (f32, f32), tolerance: f32) -> bool {
        point.0 >= self.x - tolerance
            && point.0 <= self.max_x + tolerance
            && point.1 >= self.y - tolerance
            && point.1 <= self.max_y + tolerance
    }
}

/// Evaluates one axis of a cubic Bézier at parameter `t`.
fn cubic_axis(p0: f32, c0: f32, c1: f32, p1: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * c0 + 3.0 * u * t * t * c1 + t * t * t * p1
}

/// Evaluates a cubic Bézier segment at parameter `t`.
///
/// # Arguments
///
/// * `p0`, `c0`, `c1`, `p1` - The segment's control points
/// * `t` - Curve parameter in [0, 1]
pub fn cubic_bezier_point(
    p0: (f32, f32),
    c0: (f32, f32),
    c1: (f32, f32),
    p1: (f32, f32),
    t: f32,
) -> (f32, f32) {
    (
        cubic_axis(p0.0, c0.0, c1.0, p1.0, t),
        cubic_axis(p0.1, c0.1, c1.1, p1.1, t),
    )
}

/// Folds the interior extrema of one axis into a running (min, max).
///
/// The derivative of the cubic in `t` is the quadratic `a·t² + b·t + c`;
/// roots strictly inside (0, 1) are candidate extrema. A degenerate leading
/// coefficient leaves the linear derivative `b·t + c`, whose single root is
/// still an interior extremum; only a constant derivative contributes
/// nothing beyond the endpoint extrema already seeded into the accumulator.
fn fold_axis_extrema(p0: f32, c0: f32, c1: f32, p1: f32, min: &mut f32, max: &mut f32) {
    let a = 3.0 * p1 - 9.0 * c1 + 9.0 * c0 - 3.0 * p0;
    let b = 6.0 * p0 - 12.0 * c0 + 6.0 * c1;
    let c = 3.0 * c0 - 3.0 * p0;

    if a.abs() < DERIVATIVE_EPSILON {
        // linear derivative: one sign change at t = -c/b
        if b.abs() >= DERIVATIVE_EPSILON {
            let root = -c / b;
            if root > 0.0 && root < 1.0 {
                let value = cubic_axis(p0, c0, c1, p1, root);
                *min = min.min(value);
                *max = max.max(value);
            }
        }
        return;
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return;
    }

    let sqrt_disc = disc.sqrt();
    for root in [(-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a)] {
        if root > 0.0 && root < 1.0 {
            let value = cubic_axis(p0, c0, c1, p1, root);
            *min = min.min(value);
            *max = max.max(value);
        }
    }
}

/// Computes the tight axis-aligned bounding box of a cubic Bézier segment.
///
/// Each axis is handled independently: the min/max accumulator is seeded with
/// the two endpoint coordinates, then every interior extremum of the axis
/// polynomial is folded in.
///
/// # Arguments
///
/// * `p0`, `c0`, `c1`, `p1` - The segment's control points
///
/// # Returns
///
/// The tight [`BoundingBox`] of the curve.
pub fn cubic_bezier_bounds(
    p0: (f32, f32),
    c0: (f32, f32),
    c1: (f32, f32),
    p1: (f32, f32),
) -> BoundingBox {
    let mut min_x = p0.0.min(p1.0);
    let mut max_x = p0.0.max(p1.0);
    let mut min_y = p0.1.min(p1.1);
    let mut max_y = p0.1.max(p1.1);

    fold_axis_extrema(p0.0, c0.0, c1.0, p1.0, &mut min_x, &mut max_x);
    fold_axis_extrema(p0.1, c0.1, c1.1, p1.1, &mut min_y, &mut max_y);

    BoundingBox::from_min_max(min_x, min_y, max_x, max_y)
}
