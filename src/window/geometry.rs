// SPDX-License-Identifier: GPL-3.0-only

//! Geometry primitives and the clamp policies applied by the host.
//!
//! Three clamp policies exist and each one belongs to exactly one code path:
//!
//! - [`clamp_drag`]: free dragging through `SetWindowPosition`. Up to half the
//!   window may leave the work area on every side.
//! - [`clamp_moved`]: correction after a native move of the expanded panel.
//!   Same horizontal margin, but the top edge may never go above `y = 0`.
//! - [`clamp_expand`]: the expand transition. Bounds are fixed from the
//!   default 400×600 panel rather than from the live window size.
//!
//! They are intentionally not unified.

use serde::{Deserialize, Serialize};

use crate::app_settings::{EXPANDED_HEIGHT, EXPANDED_WIDTH};

// ============================================================================
// Types
// ============================================================================

/// Top-left corner of the window in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Outer size of the window in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square of the given edge length.
    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    /// Clamps each dimension into `[min, max]`.
    ///
    /// When the limits cross, `min` wins.
    #[must_use]
    pub fn limited(self, min: Size, max: Size) -> Size {
        Size {
            width: self.width.min(max.width).max(min.width),
            height: self.height.min(max.height).max(min.height),
        }
    }

    pub(crate) fn half_width(self) -> f64 {
        f64::from(self.width) / 2.0
    }

    pub(crate) fn half_height(self) -> f64 {
        f64::from(self.height) / 2.0
    }
}

/// Usable area of the primary display (excluding panels and docks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkArea {
    pub width: u32,
    pub height: u32,
}

impl WorkArea {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Inclusive rectangle of legal top-left positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PositionBounds {
    /// Bounds letting at most half the window leave the work area on any side.
    pub fn half_offscreen(size: Size, area: WorkArea) -> Self {
        Self {
            min_x: -size.half_width(),
            max_x: f64::from(area.width) - size.half_width(),
            min_y: -size.half_height(),
            max_y: f64::from(area.height) - size.half_height(),
        }
    }

    /// Returns `true` if the position lies within the bounds.
    pub fn contains(&self, position: Position) -> bool {
        let x = f64::from(position.x);
        let y = f64::from(position.y);
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Rounds `(x, y)` to whole pixels that stay inside the bounds.
    ///
    /// Fractional bounds (odd window sizes) shrink to the nearest whole pixel
    /// inside them. When a range is empty the minimum wins.
    fn apply(&self, x: f64, y: f64) -> Position {
        Position {
            x: limit(round_half_up(x), self.min_x.ceil(), self.max_x.floor()) as i32,
            y: limit(round_half_up(y), self.min_y.ceil(), self.max_y.floor()) as i32,
        }
    }
}

// ============================================================================
// Clamp Policies
// ============================================================================

/// Clamps a requested drag position.
///
/// Returns `None` when either coordinate is NaN or infinite; such requests
/// are dropped without touching the window.
pub fn clamp_drag(x: f64, y: f64, size: Size, area: WorkArea) -> Option<Position> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(PositionBounds::half_offscreen(size, area).apply(x, y))
}

/// Corrects the position of the expanded panel after a native move.
///
/// Returns `Some` only when the current position is out of bounds.
pub fn clamp_moved(current: Position, size: Size, area: WorkArea) -> Option<Position> {
    let bounds = PositionBounds {
        min_y: 0.0,
        ..PositionBounds::half_offscreen(size, area)
    };
    if bounds.contains(current) {
        return None;
    }
    Some(bounds.apply(f64::from(current.x), f64::from(current.y)))
}

/// Bounds used when the ball expands into the default-sized panel.
pub fn expand_bounds(area: WorkArea) -> PositionBounds {
    let default = Size::new(EXPANDED_WIDTH, EXPANDED_HEIGHT);
    PositionBounds {
        min_x: -default.half_width(),
        max_x: f64::from(area.width) - default.half_width(),
        min_y: 0.0,
        max_y: f64::from(area.height) - default.half_height(),
    }
}

/// Re-clamps the current position into expand-safe bounds.
pub fn clamp_expand(current: Position, area: WorkArea) -> Position {
    expand_bounds(area).apply(f64::from(current.x), f64::from(current.y))
}

/// Rounds half-way values towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn limit(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

// ============================================================================
// Tests
// ============================================================================
