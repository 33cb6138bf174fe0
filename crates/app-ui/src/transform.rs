//! Card drag transform
//!
//! While a card is dragged its rotation, scale and opacity follow the
//! horizontal offset linearly, saturating at half the viewport width.

/// Maximum card rotation in degrees
pub const MAX_ROTATION_DEG: f32 = 15.0;

/// Card scale at full horizontal displacement
pub const MIN_SCALE: f32 = 0.95;

/// Card opacity at full horizontal displacement
pub const MIN_OPACITY: f32 = 0.8;

/// Off-screen distance of a committed card, in viewport widths
pub const EXIT_DISTANCE_FACTOR: f32 = 1.5;

/// 2-D drag offset in points
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    /// Horizontal component (positive is right)
    pub x: f32,
    /// Vertical component (positive is down)
    pub y: f32,
}

impl Offset {
    /// The resting position
    pub const ORIGIN: Offset = Offset { x: 0.0, y: 0.0 };

    /// Create an offset
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Check if this is the resting position
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Visual state of the top card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    /// Translation
    pub translate: Offset,
    /// Rotation in degrees (positive is clockwise)
    pub rotation_deg: f32,
    /// Uniform scale
    pub scale: f32,
    /// Opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CardTransform {
    /// Card at rest
    pub const IDENTITY: CardTransform = CardTransform {
        translate: Offset::ORIGIN,
        rotation_deg: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Transform for a card dragged by `offset`
    ///
    /// `max_rotation_deg` is reached at `±viewport_width / 2`; beyond that
    /// every derived value stays clamped.
    pub fn for_drag(offset: Offset, viewport_width: f32, max_rotation_deg: f32) -> Self {
        let progress = drag_progress(offset.x, viewport_width);
        let magnitude = progress.abs();

        Self {
            translate: offset,
            rotation_deg: progress * max_rotation_deg,
            scale: 1.0 - magnitude * (1.0 - MIN_SCALE),
            opacity: 1.0 - magnitude * (1.0 - MIN_OPACITY),
        }
    }
}

/// Signed drag progress in `[-1, 1]`
pub fn drag_progress(dx: f32, viewport_width: f32) -> f32 {
    let half = viewport_width / 2.0;
    if half <= 0.0 || !dx.is_finite() {
        return 0.0;
    }
    (dx / half).clamp(-1.0, 1.0)
}
