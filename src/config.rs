//! Default sizes and engine settings (world units are meters)

/// Outline samples for a full circle
pub const CIRCLE_SEGMENTS: usize = 360;
/// Lift applied above the detected surface so geometry never z-fights it
pub const SURFACE_EPSILON: f64 = 0.01;
/// Uniform scale of a vertex handle before any shape-driven adaptation
pub const HANDLE_SCALE: f64 = 0.1;
/// Width of outline polylines
pub const OUTLINE_WIDTH: f64 = 0.02;
/// Square/box handles scale with the shape at this factor of the half extent
pub const HANDLE_SCALE_FACTOR: f64 = 0.35;
/// Below this half extent a box adapts its handle scale instead of clamping
pub const BOX_HANDLE_ADAPT_LIMIT: f64 = 0.3;
/// Below this half extent a box thins its outline width to extent / 10
pub const BOX_OUTLINE_ADAPT_LIMIT: f64 = 0.2;
/// Decimal places on measurement labels
pub const LABEL_PRECISION: usize = 1;

/// Tunables threaded into the registry at construction.
///
/// Pure kernel functions take these as explicit parameters; nothing reads
/// the config through global state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Samples per circle outline (minimum 3 is enforced at sampling time)
    pub circle_segments: usize,
    /// Lift above the detected surface for pinned vertices and outlines
    pub surface_epsilon: f64,
    /// Default vertex handle scale
    pub handle_scale: f64,
    /// Default outline polyline width
    pub outline_width: f64,
    /// Decimal places on measurement labels
    pub label_precision: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            circle_segments: CIRCLE_SEGMENTS,
            surface_epsilon: SURFACE_EPSILON,
            handle_scale: HANDLE_SCALE,
            outline_width: OUTLINE_WIDTH,
            label_precision: LABEL_PRECISION,
        }
    }
}
