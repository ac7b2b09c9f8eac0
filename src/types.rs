//! Strongly-typed primitives for the shape engine (zero-cost newtypes).
//!
//! Design goals:
//! - No raw `f64` for measured quantities in domain logic
//! - Unit-correct arithmetic (`Meters * Meters = SquareMeters`)
//! - Ids are opaque; only the stores mint them

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Distance in meters (world unit of the detected surface space)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Meters(pub f64);

impl Meters {
    pub const ZERO: Meters = Meters(0.0);

    /// Get the absolute value
    #[inline]
    pub fn abs(self) -> Meters {
        Meters(self.0.abs())
    }

    /// Get the minimum of two distances
    #[inline]
    pub fn min(self, other: Meters) -> Meters {
        Meters(self.0.min(other.0))
    }

    /// Get the maximum of two distances
    #[inline]
    pub fn max(self, other: Meters) -> Meters {
        Meters(self.0.max(other.0))
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Convert to centimeters (display unit for distance labels)
    #[inline]
    pub fn to_centimeters(self) -> f64 {
        self.0 * 100.0
    }

    /// Check if this distance is finite (not NaN or infinite)
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters { Meters(self.0 + rhs.0) }
}
impl Sub for Meters {
    type Output = Meters;
    fn sub(self, rhs: Meters) -> Meters { Meters(self.0 - rhs.0) }
}
impl Mul<f64> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f64) -> Meters { Meters(self.0 * rhs) }
}
impl Div<f64> for Meters {
    type Output = Meters;
    fn div(self, rhs: f64) -> Meters { Meters(self.0 / rhs) }
}
impl Neg for Meters {
    type Output = Meters;
    fn neg(self) -> Meters { Meters(-self.0) }
}

/// Meters * Meters = area
impl Mul for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters { SquareMeters(self.0 * rhs.0) }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

/// Area in square meters
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct SquareMeters(pub f64);

impl SquareMeters {
    pub const ZERO: SquareMeters = SquareMeters(0.0);

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Add for SquareMeters {
    type Output = SquareMeters;
    fn add(self, rhs: SquareMeters) -> SquareMeters { SquareMeters(self.0 + rhs.0) }
}

/// SquareMeters * Meters = volume
impl Mul<Meters> for SquareMeters {
    type Output = CubicMeters;
    fn mul(self, rhs: Meters) -> CubicMeters { CubicMeters(self.0 * rhs.0) }
}

impl fmt::Display for SquareMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m²", self.0)
    }
}

/// Volume in cubic meters
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct CubicMeters(pub f64);

impl CubicMeters {
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl fmt::Display for CubicMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m³", self.0)
    }
}

/// A measured value carried by an annotation label
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Quantity {
    Distance(Meters),
    Area(SquareMeters),
    Volume(CubicMeters),
}

impl Quantity {
    /// Format the value the way the measurement labels display it:
    /// distances in centimeters, areas and volumes in metric units.
    pub fn label_text(self, precision: usize) -> String {
        match self {
            Quantity::Distance(m) => {
                format!("{:.prec$} cm", m.to_centimeters(), prec = precision)
            }
            Quantity::Area(a) => format!("{:.prec$} m²", a.raw(), prec = precision),
            Quantity::Volume(v) => format!("{:.prec$} m³", v.raw(), prec = precision),
        }
    }
}

/// Identifier of a vertex handle in the [`VertexStore`](crate::store::VertexStore)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VertexId(pub(crate) u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Identifier of a live shape entity in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ShapeId(pub(crate) u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// The six shape kinds a user can draw
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Circle,
    Triangle,
    Square,
    Polygon,
    Box,
}

impl ShapeKind {
    /// Number of user-placed anchors required before the entity is created
    pub fn min_anchors(self) -> usize {
        match self {
            ShapeKind::Triangle => 3,
            _ => 2,
        }
    }

    /// Whether the kind keeps accepting anchors after creation
    pub fn growable(self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Polygon)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Square => "square",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Box => "box",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch tag carried by every vertex handle.
///
/// The first point of a build session is `Unassigned` until a second point
/// fixes the session's kind; from then on the tag names the shape kind the
/// vertex belongs to and is the routing key for move/delete operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VertexTag {
    Assigned(ShapeKind),
    #[default]
    Unassigned,
}

impl VertexTag {
    /// The shape kind this tag routes to, if any
    #[inline]
    pub fn kind(self) -> Option<ShapeKind> {
        match self {
            VertexTag::Assigned(kind) => Some(kind),
            VertexTag::Unassigned => None,
        }
    }
}

impl From<ShapeKind> for VertexTag {
    fn from(kind: ShapeKind) -> VertexTag {
        VertexTag::Assigned(kind)
    }
}

impl fmt::Display for VertexTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexTag::Assigned(kind) => write!(f, "{kind}"),
            VertexTag::Unassigned => f.write_str("unassigned"),
        }
    }
}

/// Interaction state of a vertex handle, driven by the input adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HandleState {
    #[default]
    Idle,
    Hovered,
    Moving,
}
