// SPDX-License-Identifier: GPL-3.0-only

//! Snap-to-edge selection for the collapsed ball.
//!
//! Eight resting anchors are derived from the work area: the four corners and
//! the midpoints of the four edges, each inset by a padding. The anchor whose
//! centre is closest to the window's centre wins. Candidates are compared in a
//! fixed order with a strict `<`, so on a tie the earlier anchor is kept.

use serde::{Deserialize, Serialize};

use super::geometry::{round_half_up, Position, Size, WorkArea};

/// A named resting anchor for the collapsed ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapTarget {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    LeftMiddle,
    RightMiddle,
    TopMiddle,
    BottomMiddle,
}

impl SnapTarget {
    /// All anchors in evaluation order. Ties resolve to the earliest entry.
    pub const ALL: [SnapTarget; 8] = [
        SnapTarget::TopLeft,
        SnapTarget::TopRight,
        SnapTarget::BottomLeft,
        SnapTarget::BottomRight,
        SnapTarget::LeftMiddle,
        SnapTarget::RightMiddle,
        SnapTarget::TopMiddle,
        SnapTarget::BottomMiddle,
    ];

    /// Label reported to callers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapTarget::TopLeft => "top-left",
            SnapTarget::TopRight => "top-right",
            SnapTarget::BottomLeft => "bottom-left",
            SnapTarget::BottomRight => "bottom-right",
            SnapTarget::LeftMiddle => "left-middle",
            SnapTarget::RightMiddle => "right-middle",
            SnapTarget::TopMiddle => "top-middle",
            SnapTarget::BottomMiddle => "bottom-middle",
        }
    }

    /// Unrounded top-left corner of this anchor for a window of `size`.
    pub fn anchor(self, size: Size, area: WorkArea, padding: i32) -> (f64, f64) {
        let padding = f64::from(padding);
        let free_x = f64::from(area.width) - f64::from(size.width);
        let free_y = f64::from(area.height) - f64::from(size.height);

        let left = padding;
        let right = free_x - padding;
        let center_x = free_x / 2.0;
        let top = padding;
        let bottom = free_y - padding;
        let center_y = free_y / 2.0;

        match self {
            SnapTarget::TopLeft => (left, top),
            SnapTarget::TopRight => (right, top),
            SnapTarget::BottomLeft => (left, bottom),
            SnapTarget::BottomRight => (right, bottom),
            SnapTarget::LeftMiddle => (left, center_y),
            SnapTarget::RightMiddle => (right, center_y),
            SnapTarget::TopMiddle => (center_x, top),
            SnapTarget::BottomMiddle => (center_x, bottom),
        }
    }
}

impl std::fmt::Display for SnapTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen anchor and the whole-pixel position the window moves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snap {
    pub target: SnapTarget,
    pub position: Position,
}

/// Picks the anchor nearest to the window's current centre.
pub fn nearest(current: Position, size: Size, area: WorkArea, padding: i32) -> Snap {
    let half_w = size.half_width();
    let half_h = size.half_height();
    let center_x = f64::from(current.x) + half_w;
    let center_y = f64::from(current.y) + half_h;

    let mut best = SnapTarget::ALL[0];
    let mut best_anchor = best.anchor(size, area, padding);
    let mut best_distance = f64::INFINITY;

    for target in SnapTarget::ALL {
        let anchor = target.anchor(size, area, padding);
        let distance = (center_x - (anchor.0 + half_w)).hypot(center_y - (anchor.1 + half_h));
        if distance < best_distance {
            best = target;
            best_anchor = anchor;
            best_distance = distance;
        }
    }

    Snap {
        target: best,
        position: Position::new(
            round_half_up(best_anchor.0) as i32,
            round_half_up(best_anchor.1) as i32,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: WorkArea = WorkArea::new(1920, 1080);
    const BALL: Size = Size::square(80);
    const PADDING: i32 = 20;

    /// Test: a ball near the origin snaps to the top-left corner.
    #[test]
    fn test_origin_snaps_top_left() {
        let snap = nearest(Position::new(-40, -40), BALL, SCREEN, PADDING);
        assert_eq!(snap.target, SnapTarget::TopLeft);
        assert_eq!(snap.position, Position::new(20, 20));
    }

    /// Test: every anchor is reachable from a point sitting on it.
    #[test]
    fn test_each_anchor_wins_on_itself() {
        for target in SnapTarget::ALL {
            let (x, y) = target.anchor(BALL, SCREEN, PADDING);
            let snap = nearest(Position::new(x as i32, y as i32), BALL, SCREEN, PADDING);
            assert_eq!(snap.target, target, "anchor {target} should win on itself");
        }
    }

    /// Test: anchor coordinates for a 1920x1080 screen.
    #[test]
    fn test_anchor_coordinates() {
        let expected = [
            (SnapTarget::TopLeft, (20.0, 20.0)),
            (SnapTarget::TopRight, (1820.0, 20.0)),
            (SnapTarget::BottomLeft, (20.0, 980.0)),
            (SnapTarget::BottomRight, (1820.0, 980.0)),
            (SnapTarget::LeftMiddle, (20.0, 500.0)),
            (SnapTarget::RightMiddle, (1820.0, 500.0)),
            (SnapTarget::TopMiddle, (920.0, 20.0)),
            (SnapTarget::BottomMiddle, (920.0, 980.0)),
        ];
        for (target, anchor) in expected {
            assert_eq!(target.anchor(BALL, SCREEN, PADDING), anchor, "{target}");
        }
    }

    /// Test: identical inputs always produce the same result.
    #[test]
    fn test_snap_is_deterministic() {
        let first = nearest(Position::new(1234, 567), BALL, SCREEN, PADDING);
        for _ in 0..10 {
            assert_eq!(nearest(Position::new(1234, 567), BALL, SCREEN, PADDING), first);
        }
    }

    /// Test: equidistant candidates resolve to the earlier one.
    #[test]
    fn test_tie_prefers_enumeration_order() {
        // Square screen, ball centred exactly: the four edge midpoints are
        // equally close and left-middle is enumerated first among them.
        let area = WorkArea::new(1000, 1000);
        let snap = nearest(Position::new(460, 460), BALL, area, PADDING);
        assert_eq!(snap.target, SnapTarget::LeftMiddle);
        assert_eq!(snap.position, Position::new(20, 460));
    }

    /// Test: half-pixel midpoints round to whole pixels.
    #[test]
    fn test_midpoint_rounding() {
        let area = WorkArea::new(1921, 1081);
        let snap = nearest(Position::new(900, 5), BALL, area, PADDING);
        assert_eq!(snap.target, SnapTarget::TopMiddle);
        assert_eq!(snap.position, Position::new(921, 20));
    }

    /// Test: labels match the reported edge names.
    #[test]
    fn test_labels() {
        let labels: Vec<&str> = SnapTarget::ALL.iter().map(SnapTarget::as_str).collect();
        assert_eq!(
            labels,
            [
                "top-left",
                "top-right",
                "bottom-left",
                "bottom-right",
                "left-middle",
                "right-middle",
                "top-middle",
                "bottom-middle"
            ]
        );
    }
}
