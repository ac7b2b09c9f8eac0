//! Pure geometry kernel: corner derivation, sampling, triangulation, areas.
//!
//! Every function here is stateless and never produces NaN geometry.
//! Square derivation tolerates coincident anchors by collapsing to a point;
//! box derivation needs a base direction and reports coincident anchors as
//! [`EngineError::DegenerateGeometry`]. World space is y-up, all units
//! meters.

use glam::DVec3;

use crate::errors::EngineError;
use crate::types::{CubicMeters, Meters, ShapeKind, SquareMeters};

/// Direction of the fixed quarter-turn rotation about +Y.
///
/// The crate-wide convention maps `(x, z)` to `(z, -x)` going forward;
/// applying the turn twice negates both coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Forward,
    Back,
}

impl Turn {
    /// Rotate `v` a quarter turn about +Y, leaving y untouched
    #[inline]
    pub fn apply(self, v: DVec3) -> DVec3 {
        match self {
            Turn::Forward => DVec3::new(v.z, v.y, -v.x),
            Turn::Back => DVec3::new(-v.z, v.y, v.x),
        }
    }
}

/// Corners of a square derived from its center and one side-midpoint anchor.
///
/// `half` is the distance between the anchors; the square is centered on
/// `center` with full side length `2 * half`, and `side_anchor` ends up as
/// the midpoint of the edge `c3 -> c0`. Corner order is stable so mesh
/// winding and edge labeling can rely on it. Coincident anchors collapse
/// to a zero-area square with all four corners on the anchor.
pub fn derive_square_corners(center: DVec3, side_anchor: DVec3) -> [DVec3; 4] {
    let Some(toward) = (center - side_anchor).try_normalize() else {
        return [side_anchor; 4];
    };
    let half = center.distance(side_anchor);
    let up = Turn::Forward.apply(toward);

    let c0 = side_anchor - up * half;
    let c1 = c0 + toward * (2.0 * half);
    let c3 = side_anchor + up * half;
    let c2 = c3 + toward * (2.0 * half);
    [c0, c1, c2, c3]
}

/// The eight corners of a box, bottom ring then top ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCorners {
    pub bottom: [DVec3; 4],
    pub top: [DVec3; 4],
}

impl BoxCorners {
    /// The four vertical edges, bottom corner paired with its top corner
    pub fn vertical_edges(&self) -> [(DVec3, DVec3); 4] {
        [
            (self.bottom[0], self.top[0]),
            (self.bottom[1], self.top[1]),
            (self.bottom[2], self.top[2]),
            (self.bottom[3], self.top[3]),
        ]
    }
}

/// Corners of a box from its center, two base half-extent anchors and the
/// height anchor.
///
/// The base ring lies in the anchors' plane; the top ring carries the same
/// x/z at the height anchor's altitude. Height is signed: dragging the
/// height anchor below the base flips the box downward.
///
/// Corner order is stable: `bottom[0] -> bottom[1]` runs along the width
/// axis (full width), `bottom[1] -> bottom[2]` along the length axis.
pub fn derive_box_corners(
    center: DVec3,
    width_anchor: DVec3,
    length_anchor: DVec3,
    height_anchor: DVec3,
) -> Result<BoxCorners, EngineError> {
    let degenerate = || EngineError::DegenerateGeometry {
        kind: ShapeKind::Box,
        position: center,
    };
    let w = (center - width_anchor).try_normalize().ok_or_else(degenerate)?;
    let l = (center - length_anchor).try_normalize().ok_or_else(degenerate)?;
    let hw = center.distance(width_anchor);
    let hl = center.distance(length_anchor);

    let bottom = [
        center - l * hl + w * hw,
        center - l * hl - w * hw,
        center + l * hl - w * hw,
        center + l * hl + w * hw,
    ];
    let top = bottom.map(|b| DVec3::new(b.x, height_anchor.y, b.z));
    Ok(BoxCorners { bottom, top })
}

/// Re-derive the anchor perpendicular to one that just moved.
///
/// The replacement sits a quarter turn (`turn`) from the moved anchor's
/// direction, at its own preserved half extent, so the base is rectangular
/// again after any width/length drag.
pub fn replace_perpendicular_anchor(
    center: DVec3,
    moved_anchor: DVec3,
    preserved_extent: f64,
    turn: Turn,
) -> Result<DVec3, EngineError> {
    let direction = (center - moved_anchor).try_normalize().ok_or(
        EngineError::DegenerateGeometry {
            kind: ShapeKind::Box,
            position: center,
        },
    )?;
    Ok(center + turn.apply(direction) * preserved_extent)
}

/// Sample the distinct outline points of a circle (no closing duplicate).
///
/// Points run clockwise from +Z when seen from above: `x = r sin`,
/// `z = r cos`. Fewer than 3 segments are clamped to 3.
pub fn circle_points(center: DVec3, radius: f64, segments: usize) -> Vec<DVec3> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / segments as f64;
            center + DVec3::new(radius * theta.sin(), 0.0, radius * theta.cos())
        })
        .collect()
}

/// The closed outline ring of a circle: `segments + 1` points, the last an
/// exact duplicate of the first.
pub fn circle_ring(center: DVec3, radius: f64, segments: usize) -> Vec<DVec3> {
    let mut ring = circle_points(center, radius, segments);
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Fan-triangulate `count` boundary points into index triples
/// `(0, i+1, i+2)`.
///
/// Exactly `count - 2` triangles for `count >= 3`; empty for fewer points.
pub fn fan_triangulate(count: usize) -> Vec<u32> {
    if count < 3 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity((count - 2) * 3);
    for i in 0..count - 2 {
        indices.push(0);
        indices.push(i as u32 + 1);
        indices.push(i as u32 + 2);
    }
    indices
}

/// Heron's formula over three side lengths.
///
/// The radicand is clamped to zero so collinear or numerically degenerate
/// triangles report area 0 rather than NaN.
pub fn heron_area(a: Meters, b: Meters, c: Meters) -> SquareMeters {
    let s = (a.raw() + b.raw() + c.raw()) / 2.0;
    let radicand = s * (s - a.raw()) * (s - b.raw()) * (s - c.raw());
    SquareMeters(radicand.max(0.0).sqrt())
}

/// Area of the triangle spanned by three points, via Heron
pub fn triangle_area(p0: DVec3, p1: DVec3, p2: DVec3) -> SquareMeters {
    heron_area(
        Meters(p0.distance(p1)),
        Meters(p1.distance(p2)),
        Meters(p2.distance(p0)),
    )
}

/// Area of a fan-triangulated polygon boundary: the Heron areas of
/// triangles `(0, i+1, i+2)` summed. Fewer than 3 points have zero area.
pub fn polygon_fan_area(points: &[DVec3]) -> SquareMeters {
    if points.len() < 3 {
        return SquareMeters::ZERO;
    }
    let mut area = SquareMeters::ZERO;
    for i in 0..points.len() - 2 {
        area = area + triangle_area(points[0], points[i + 1], points[i + 2]);
    }
    area
}

/// Disc area of a circle
pub fn circle_area(radius: Meters) -> SquareMeters {
    SquareMeters(std::f64::consts::PI * radius.raw() * radius.raw())
}

/// Volume of a box from its full extents (signed height passes through)
pub fn box_volume(width: Meters, length: Meters, height: Meters) -> CubicMeters {
    (width * length) * height
}

/// Arithmetic centroid of a point set (zero for an empty set)
pub fn centroid(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    points.iter().sum::<DVec3>() / points.len() as f64
}

/// Yaw about +Y that aligns label text with `direction`, measured from +Z
/// toward +X (the same convention as the quarter turn)
pub fn label_yaw(direction: DVec3) -> f64 {
    direction.x.atan2(direction.z)
}
